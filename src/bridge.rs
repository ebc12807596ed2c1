//! Control loop glue.
//!
//! [`Bridge`] is the one place that owns the [`AppService`], the pulse
//! hardware, and both event sinks. The firmware's main loop feeds it
//! broker traffic and button edges; integration tests drive it the same
//! way with mock adapters.
//!
//! ```text
//!  mqtt-rx thread ──Inbound──▶ ┐
//!                              ├──▶ Bridge ──▶ AppService ──▶ PulsePort
//!  GPIO ISR ──EdgeQueue──────▶ ┘        └──▶ (LogEventSink, MqttLink)
//! ```
//!
//! Everything runs on the calling thread, so a convergence in progress
//! finishes before the next message or edge is looked at.

use log::{debug, warn};

use crate::adapters::log_sink::LogEventSink;
use crate::adapters::mqtt::{Inbound, MqttLink};
use crate::app::ports::{MqttClientPort, PulsePort};
use crate::app::service::AppService;
use crate::config::BridgeConfig;
use crate::events::{EdgeEvent, EdgeQueue};

pub struct Bridge<H, C> {
    app: AppService,
    hw: H,
    sinks: (LogEventSink, MqttLink<C>),
    last_dropped_edges: u32,
}

impl<H: PulsePort, C: MqttClientPort> Bridge<H, C> {
    pub fn new(config: &BridgeConfig, hw: H, client: C) -> Self {
        Self {
            app: AppService::new(config),
            hw,
            sinks: (LogEventSink::new(), MqttLink::new(client, config.topics())),
            last_dropped_edges: 0,
        }
    }

    /// Run the boot sequence (both appliances to mode 0, status published).
    pub fn start(&mut self) {
        self.app.start(&mut self.hw, &mut self.sinks);
    }

    /// Apply one item from the broker receiver.
    pub fn on_inbound(&mut self, item: Inbound, now_ms: u32) {
        match item {
            Inbound::Connected => {
                self.sinks.1.on_connected(now_ms);
                // Whatever the hub believes is stale after a reconnect.
                self.app.republish(&mut self.sinks);
            }
            Inbound::Disconnected => self.sinks.1.on_disconnected(),
            Inbound::Message { topic, payload } => {
                if let Err(e) =
                    self.app
                        .handle_message(&topic, &payload, &mut self.hw, &mut self.sinks)
                {
                    debug!("dropping message on {}: {}", topic, e);
                }
            }
        }
    }

    /// Debounce and apply one raw button edge.
    pub fn on_edge(&mut self, edge: EdgeEvent) {
        self.app.handle_edge(edge, &mut self.hw, &mut self.sinks);
    }

    /// Drain every edge the ISRs have queued.
    pub fn service_edges(&mut self, queue: &EdgeQueue) {
        queue.drain(|edge| self.on_edge(edge));
        let dropped = queue.dropped();
        if dropped != self.last_dropped_edges {
            warn!(
                "edge queue overflowed: {} edges lost since boot",
                dropped
            );
            self.last_dropped_edges = dropped;
        }
    }

    /// Periodic housekeeping (subscription retries).
    pub fn poll(&mut self, now_ms: u32) {
        self.sinks.1.poll(now_ms);
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn link(&self) -> &MqttLink<C> {
        &self.sinks.1
    }

    pub fn link_mut(&mut self) -> &mut MqttLink<C> {
        &mut self.sinks.1
    }
}
