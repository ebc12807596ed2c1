//! Application service — the hexagonal core.
//!
//! [`AppService`] owns both appliance controllers, the router, and the
//! debouncer. It is the single writer of every mode counter: broker
//! messages and button edges are fed in one at a time from the control
//! loop, and each runs its convergence to completion before the next is
//! looked at. All I/O flows through port traits injected at call sites.
//!
//! ```text
//!  broker msg ──▶ decode ──▶ route ──┐
//!                                    ├──▶ controller ──▶ PulsePort
//!  edge ──▶ debounce ──▶ press ──────┘         │
//!                                              └──────▶ EventSink
//! ```

use log::info;

use crate::config::BridgeConfig;
use crate::drivers::button::Debouncer;
use crate::error::CommandError;
use crate::events::EdgeEvent;
use crate::topics::Topics;

use super::commands::AppCommand;
use super::controller::ApplianceController;
use super::events::AppEvent;
use super::mode::{Appliance, CyclicMode, FanMode, LightMode};
use super::ports::{EventSink, PulsePort};
use super::router::{CommandRouter, Request};

/// What happened to an inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(Request),
    Ignored,
}

pub struct AppService {
    topics: Topics,
    router: CommandRouter,
    debouncer: Debouncer,
    fan: ApplianceController<FanMode>,
    light: ApplianceController<LightMode>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** run the boot sequence; call [`start`](Self::start) next.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            topics: config.topics(),
            router: CommandRouter,
            debouncer: Debouncer::new(config.debounce_ms),
            fan: ApplianceController::new(),
            light: ApplianceController::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force both appliances to mode 0 (light first) and advertise them.
    ///
    /// The counters already read 0 at power-on, so this pulses nothing;
    /// what it guarantees is a full status publish before anything else.
    pub fn start(&mut self, hw: &mut impl PulsePort, sink: &mut impl EventSink) {
        self.light.set_mode(LightMode::boot(), hw, sink);
        self.fan.set_mode(FanMode::boot(), hw, sink);
        sink.emit(&AppEvent::Started {
            fan: self.fan.current(),
            light: self.light.current(),
        });
        info!(
            "AppService started: fan={:?} light={:?}",
            self.fan.current(),
            self.light.current()
        );
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Decode, route, and apply one broker message. Unknown topics and
    /// malformed payloads are returned as errors before anything changes
    /// or is published.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        hw: &mut impl PulsePort,
        sink: &mut impl EventSink,
    ) -> Result<Outcome, CommandError> {
        let cmd = AppCommand::decode(&self.topics, topic, payload)?;
        Ok(self.handle_command(cmd, hw, sink))
    }

    /// Route and apply an already-decoded command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl PulsePort,
        sink: &mut impl EventSink,
    ) -> Outcome {
        match self
            .router
            .route(cmd, self.fan.current(), self.light.current())
        {
            Some(request) => {
                info!("{:?} -> {:?}", cmd, request);
                self.apply(request, hw, sink);
                Outcome::Applied(request)
            }
            None => {
                info!("{:?} ignored (light {:?})", cmd, self.light.current());
                sink.emit(&AppEvent::CommandIgnored(cmd));
                Outcome::Ignored
            }
        }
    }

    /// Debounce one raw edge; an accepted press advances its appliance.
    /// Returns the appliance that moved, if any.
    pub fn handle_edge(
        &mut self,
        edge: EdgeEvent,
        hw: &mut impl PulsePort,
        sink: &mut impl EventSink,
    ) -> Option<Appliance> {
        let press = self.debouncer.on_event(edge)?;
        sink.emit(&AppEvent::ButtonPressed(press.input));
        let request = self.router.press(press.input);
        self.apply(request, hw, sink);
        Some(press.input)
    }

    /// Re-advertise both appliances without pulsing (after a reconnect).
    pub fn republish(&self, sink: &mut impl EventSink) {
        self.fan.republish(sink);
        self.light.republish(sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn fan_mode(&self) -> FanMode {
        self.fan.current()
    }

    pub fn light_mode(&self) -> LightMode {
        self.light.current()
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply(&mut self, request: Request, hw: &mut impl PulsePort, sink: &mut impl EventSink) {
        match request {
            Request::SetFan(mode) => {
                self.fan.set_mode(mode, hw, sink);
            }
            Request::SetLight(mode) => {
                self.light.set_mode(mode, hw, sink);
            }
            Request::Advance(Appliance::Fan) => {
                self.fan.advance(hw, sink);
            }
            Request::Advance(Appliance::Light) => {
                self.light.advance(hw, sink);
            }
        }
    }
}
