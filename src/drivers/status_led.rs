//! Boot status indicator.
//!
//! A single active-low LED: lit from power-on (the output idles low after
//! `hw_init`) and cleared once the boot sequence has advertised both
//! appliances.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct StatusIndicator<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusIndicator<P> {
    /// `lit` is the level the pin is already at.
    pub fn new(pin: P, lit: bool) -> Self {
        Self { pin, lit }
    }

    pub fn set(&mut self, lit: bool) -> Result<(), ActuatorError> {
        let res = if lit {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.lit = lit;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
