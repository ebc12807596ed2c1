//! Simulated button-press driver.
//!
//! One [`PulseDriver`] per appliance. A pulse closes the appliance's
//! button contacts for `on_ms`, opens them, then waits `off_ms` so the
//! appliance registers the next press as a separate one:
//!
//! ```text
//!        ┌──── on_ms ────┐
//!  ──────┘               └──── off_ms ────  (next pulse may start)
//! ```
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` pin and delay traits: `GpioOutput` plus a
//! FreeRTOS delay on ESP-IDF, in-memory mocks on the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::ActuatorError;

pub const DEFAULT_PULSE_ON_MS: u32 = 30;
pub const DEFAULT_PULSE_OFF_MS: u32 = 50;

pub struct PulseDriver<P, D> {
    pin: P,
    delay: D,
    on_ms: u32,
    off_ms: u32,
    pulses: u32,
}

impl<P: OutputPin, D: DelayNs> PulseDriver<P, D> {
    pub fn new(pin: P, delay: D, on_ms: u32, off_ms: u32) -> Self {
        Self {
            pin,
            delay,
            on_ms,
            off_ms,
            pulses: 0,
        }
    }

    /// One full press. Blocks for `on_ms + off_ms`.
    pub fn pulse(&mut self) -> Result<(), ActuatorError> {
        if self.pin.set_high().is_err() {
            // Never leave the contacts closed: a held button is a
            // different gesture on most appliances.
            if self.pin.set_low().is_err() {
                warn!("pulse: output stuck, release also failed");
            }
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.delay.delay_ms(self.on_ms);
        self.pin
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.delay.delay_ms(self.off_ms);
        self.pulses = self.pulses.wrapping_add(1);
        Ok(())
    }

    /// Drive the output to the released level.
    pub fn release(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)
    }

    /// Pulses completed since construction.
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    /// Milliseconds one pulse occupies the caller.
    pub fn period_ms(&self) -> u32 {
        self.on_ms + self.off_ms
    }
}
