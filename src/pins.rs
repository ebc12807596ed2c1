//! GPIO pin assignments for the bridge board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.
//!
//! Two separate circuits per appliance:
//!
//! - The button input reads the user's momentary switch on the bridge
//!   enclosure. It is wired only to the ESP32 (switch to ground, internal
//!   pull-up); a press is turned into one pulse by the firmware.
//! - The pulse output drives an opto-isolator across the appliance's own
//!   control-panel contacts. It has no path back to the button input, so
//!   the firmware's pulses are never seen as presses.

// ---------------------------------------------------------------------------
// Fan / diffuser
// ---------------------------------------------------------------------------

/// Digital input: user fan button (active-low, internal pull-up).
pub const FAN_BUTTON_GPIO: i32 = 5;
/// Digital output: HIGH closes the appliance's fan contacts via the opto-isolator.
pub const FAN_PULSE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Light
// ---------------------------------------------------------------------------

/// Digital input: user light button (active-low, internal pull-up).
pub const LIGHT_BUTTON_GPIO: i32 = 27;
/// Digital output: HIGH closes the appliance's light contacts via the opto-isolator.
pub const LIGHT_PULSE_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Status indicator
// ---------------------------------------------------------------------------

/// On-board LED, active-low. Lit from power-on until the boot sequence
/// has published both statuses.
pub const STATUS_LED_GPIO: i32 = 2;
