//! Command routing policy.
//!
//! Turns a decoded [`AppCommand`] into a desired-mode [`Request`], given the
//! modes both appliances are in right now. Pure: no I/O, no state of its own.

use super::commands::{AppCommand, Effect, Power, Speed};
use super::mode::{Appliance, CyclicMode, FanMode, LightMode};

/// What a controller should do next. Consumed immediately, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    SetFan(FanMode),
    SetLight(LightMode),
    /// One button press worth of progress.
    Advance(Appliance),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRouter;

impl CommandRouter {
    /// `None` means the command is deliberately ignored: no pulses and no
    /// status publish.
    pub fn route(&self, cmd: AppCommand, fan: FanMode, light: LightMode) -> Option<Request> {
        let request = match cmd {
            AppCommand::LightEffect(Effect::ColorLoop) => Request::SetLight(LightMode::ColorLoop),
            AppCommand::LightEffect(Effect::None) => Request::SetLight(match light {
                LightMode::ColorLoop => LightMode::On,
                _ => LightMode::Off,
            }),
            // Hubs re-assert "on" right after an effect is chosen; acting on
            // it would cycle the light out of the colour loop.
            AppCommand::LightSwitch(1) if light == LightMode::ColorLoop => return None,
            AppCommand::LightSwitch(v) => Request::SetLight(LightMode::wrapping_from(v)),
            AppCommand::FanPower(Power::On) => Request::SetFan(match fan {
                FanMode::Off => FanMode::High,
                running => running,
            }),
            AppCommand::FanPower(Power::Off) | AppCommand::FanSpeed(Speed::Off) => {
                Request::SetFan(FanMode::Off)
            }
            AppCommand::FanSpeed(Speed::Low) => Request::SetFan(FanMode::Low),
            AppCommand::FanSpeed(Speed::High) => Request::SetFan(FanMode::High),
        };
        Some(request)
    }

    /// A debounced physical press always advances its own appliance.
    pub fn press(&self, input: Appliance) -> Request {
        Request::Advance(input)
    }
}
