//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (pulse outputs, event sinks, the broker client, the
//! Wi-Fi station) implement
//! these traits. The [`AppService`](super::service::AppService) consumes them
//! via generics, so the domain core never touches GPIO or the network.

use crate::error::{ActuatorError, TransportError};

use super::events::AppEvent;
use super::mode::Appliance;

// ───────────────────────────────────────────────────────────────
// Pulse port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: one call is one simulated button press on the
/// appliance, blocking for the full on + off hold.
pub trait PulsePort {
    fn pulse(&mut self, appliance: Appliance) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / broker)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log, MQTT status topics).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Two sinks side by side receive every event, left first.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &AppEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Broker client port (driven adapter: link ↔ MQTT client)
// ───────────────────────────────────────────────────────────────

/// Minimal fire-and-forget MQTT client surface.
///
/// Publishes are QoS 0 and not retained; nothing waits for a broker ack.
pub trait MqttClientPort {
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Station port (driven adapter: control loop ↔ Wi-Fi driver)
// ───────────────────────────────────────────────────────────────

/// The network interface underneath the broker client.
pub trait StationPort {
    /// Associated and holding an address.
    fn is_connected(&self) -> bool;
    /// One blocking (re)association attempt.
    fn connect(&mut self) -> Result<(), TransportError>;
}
