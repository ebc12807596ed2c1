//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (log to serial, publish over MQTT).

use heapless::Vec;

use crate::topics::Topics;

use super::commands::AppCommand;
use super::mode::{Appliance, FanMode, LightMode};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service finished the boot sequence (carries the initial modes).
    Started { fan: FanMode, light: LightMode },

    /// The fan finished converging (or was asked to re-advertise).
    FanStatus(FanMode),

    /// The light finished converging (or was asked to re-advertise).
    LightStatus(LightMode),

    /// A debounced physical button press was accepted.
    ButtonPressed(Appliance),

    /// A well-formed command was deliberately not acted on.
    CommandIgnored(AppCommand),
}

impl From<FanMode> for AppEvent {
    fn from(mode: FanMode) -> Self {
        Self::FanStatus(mode)
    }
}

impl From<LightMode> for AppEvent {
    fn from(mode: LightMode) -> Self {
        Self::LightStatus(mode)
    }
}

/// The `(topic, payload)` pairs a status event publishes. Events that are
/// not status snapshots publish nothing.
pub fn status_messages<'t>(topics: &'t Topics, event: &AppEvent) -> Vec<(&'t str, &'static str), 2> {
    let mut out = Vec::new();
    let pairs: [(&'t str, &'static str); 2] = match *event {
        AppEvent::FanStatus(mode) => [
            (&topics.fan_speed_state, mode.speed_state()),
            (&topics.fan_state, mode.power_state()),
        ],
        AppEvent::LightStatus(mode) => [
            (&topics.light_status, mode.status()),
            (&topics.light_effect_status, mode.effect()),
        ],
        _ => return out,
    };
    for pair in pairs {
        // Capacity matches the array; push cannot fail.
        let _ = out.push(pair);
    }
    out
}
