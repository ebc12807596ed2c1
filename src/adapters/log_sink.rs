//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The MQTT link implements the same trait; the control loop pairs them.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { fan, light } => {
                info!("START | fan={:?} light={:?}", fan, light);
            }
            AppEvent::FanStatus(mode) => {
                info!(
                    "FAN   | {:?} | speed={} state={}",
                    mode,
                    mode.speed_state(),
                    mode.power_state()
                );
            }
            AppEvent::LightStatus(mode) => {
                info!(
                    "LIGHT | {:?} | status={} effect={}",
                    mode,
                    mode.status(),
                    mode.effect()
                );
            }
            AppEvent::ButtonPressed(appliance) => {
                info!("BTN   | {} pressed", appliance);
            }
            AppEvent::CommandIgnored(cmd) => {
                info!("IGNORE| {:?}", cmd);
            }
        }
    }
}
