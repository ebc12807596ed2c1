//! Button, pulse and indicator drivers, plus hardware initialisation.

pub mod button;
pub mod hw_init;
pub mod pulse;
pub mod status_led;
