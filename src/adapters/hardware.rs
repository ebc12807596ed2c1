//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns both pulse drivers and the status indicator, exposing the
//! pulse outputs through [`PulsePort`]. This is the only module in the
//! system that drives the appliance. On non-espidf targets the
//! underlying pins are simulation stubs or test mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::mode::Appliance;
use crate::app::ports::PulsePort;
use crate::drivers::pulse::PulseDriver;
use crate::drivers::status_led::StatusIndicator;
use crate::error::ActuatorError;

/// Concrete adapter that combines all outputs behind port traits.
pub struct HardwareAdapter<P, D> {
    fan: PulseDriver<P, D>,
    light: PulseDriver<P, D>,
    status: StatusIndicator<P>,
}

impl<P: OutputPin, D: DelayNs> HardwareAdapter<P, D> {
    pub fn new(fan: PulseDriver<P, D>, light: PulseDriver<P, D>, status: StatusIndicator<P>) -> Self {
        Self { fan, light, status }
    }

    fn driver(&mut self, appliance: Appliance) -> &mut PulseDriver<P, D> {
        match appliance {
            Appliance::Fan => &mut self.fan,
            Appliance::Light => &mut self.light,
        }
    }

    /// Turn the boot indicator off once the bridge is up.
    pub fn clear_status_indicator(&mut self) -> Result<(), ActuatorError> {
        self.status.clear()
    }

    pub fn status_lit(&self) -> bool {
        self.status.is_lit()
    }

    /// Pulses completed on `appliance` since boot.
    pub fn pulse_count(&self, appliance: Appliance) -> u32 {
        match appliance {
            Appliance::Fan => self.fan.pulse_count(),
            Appliance::Light => self.light.pulse_count(),
        }
    }

    /// Drive both pulse outputs to the released level.
    pub fn release_all(&mut self) {
        for appliance in Appliance::ALL {
            if let Err(e) = self.driver(appliance).release() {
                warn!("{}: release failed: {}", appliance, e);
            }
        }
    }
}

// ── PulsePort implementation ──────────────────────────────────

impl<P: OutputPin, D: DelayNs> PulsePort for HardwareAdapter<P, D> {
    fn pulse(&mut self, appliance: Appliance) -> Result<(), ActuatorError> {
        self.driver(appliance).pulse()
    }
}
