//! Bounded cyclic appliance modes.
//!
//! Each appliance has one push-button that steps an internal counter
//! around a fixed ring:
//!
//! ```text
//!   Fan:    Off ──▶ High ──▶ Low ──────▶ Off ...
//!   Light:  Off ──▶ On ───▶ ColorLoop ──▶ Off ...
//! ```
//!
//! The only transition is `+1 mod COUNT`; there are no direct jumps.
//! Raw integers become modes either through [`CyclicMode::try_from_index`]
//! (rejects anything outside the ring) or [`CyclicMode::wrapping_from`]
//! (reduces modulo the ring size), so a target the counter can never reach
//! is unrepresentable by the time it gets to the actuator.

use core::fmt;

use crate::error::ModeError;

/// The two appliances, their buttons, and their pulse outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appliance {
    Fan,
    Light,
}

impl Appliance {
    pub const ALL: [Self; 2] = [Self::Fan, Self::Light];

    pub fn name(self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mode counter that only moves forward by one, wrapping at `COUNT`.
pub trait CyclicMode: Copy + Eq + fmt::Debug + 'static {
    /// Every mode in button-press order. Index 0 is the power-on mode.
    const RING: &'static [Self];
    /// Which appliance this counter belongs to.
    const APPLIANCE: Appliance;
    const COUNT: u8 = Self::RING.len() as u8;

    /// Position in [`Self::RING`].
    fn index(self) -> u8;

    /// The mode the appliance powers up in.
    fn boot() -> Self {
        Self::RING[0]
    }

    fn try_from_index(index: u8) -> Result<Self, ModeError> {
        Self::RING
            .get(index as usize)
            .copied()
            .ok_or(ModeError::OutOfRange {
                value: index as i64,
                count: Self::COUNT,
            })
    }

    /// Reduce any integer onto the ring (Euclidean, so `-1` is the last mode).
    fn wrapping_from(value: i64) -> Self {
        Self::RING[value.rem_euclid(Self::COUNT as i64) as usize]
    }

    /// The mode one button press away.
    fn next(self) -> Self {
        Self::RING[(self.index() as usize + 1) % Self::RING.len()]
    }

    /// Button presses needed to get from `self` to `target`.
    fn steps_to(self, target: Self) -> u8 {
        (target.index() + Self::COUNT - self.index()) % Self::COUNT
    }
}

// ---------------------------------------------------------------------------
// Fan / diffuser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FanMode {
    Off = 0,
    High = 1,
    Low = 2,
}

impl CyclicMode for FanMode {
    const RING: &'static [Self] = &[Self::Off, Self::High, Self::Low];
    const APPLIANCE: Appliance = Appliance::Fan;

    fn index(self) -> u8 {
        self as u8
    }
}

impl FanMode {
    pub fn is_on(self) -> bool {
        self != Self::Off
    }

    /// Payload for the `fan/speed_state` topic.
    pub fn speed_state(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::High => "high",
            Self::Low => "low",
        }
    }

    /// Payload for the `fan/state` topic.
    pub fn power_state(self) -> &'static str {
        if self.is_on() { "on" } else { "off" }
    }
}

// ---------------------------------------------------------------------------
// Light
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightMode {
    Off = 0,
    On = 1,
    ColorLoop = 2,
}

impl CyclicMode for LightMode {
    const RING: &'static [Self] = &[Self::Off, Self::On, Self::ColorLoop];
    const APPLIANCE: Appliance = Appliance::Light;

    fn index(self) -> u8 {
        self as u8
    }
}

impl LightMode {
    /// Payload for the `light/status` topic. The colour loop reports as on.
    pub fn status(self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On | Self::ColorLoop => "1",
        }
    }

    /// Payload for the `light/effect_status` topic.
    pub fn effect(self) -> &'static str {
        match self {
            Self::Off | Self::On => "none",
            Self::ColorLoop => "color_loop",
        }
    }
}
