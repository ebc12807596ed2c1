//! Mock adapters for integration tests.
//!
//! Records every pulse, subscription, and publish so tests can assert on
//! the full history without touching GPIO or a broker.

use homedic::app::events::AppEvent;
use homedic::app::mode::Appliance;
use homedic::app::ports::{EventSink, MqttClientPort, PulsePort};
use homedic::error::{ActuatorError, TransportError};

// ── MockPulses ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPulses {
    pub pulses: Vec<Appliance>,
    /// Fail every pulse after this many have succeeded.
    pub fail_after: Option<usize>,
}

#[allow(dead_code)]
impl MockPulses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, appliance: Appliance) -> usize {
        self.pulses.iter().filter(|a| **a == appliance).count()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

impl PulsePort for MockPulses {
    fn pulse(&mut self, appliance: Appliance) -> Result<(), ActuatorError> {
        if self.fail_after.is_some_and(|n| self.pulses.len() >= n) {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.pulses.push(appliance);
        Ok(())
    }
}

// ── MockClient ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClient {
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, String)>,
    pub fail_subscribe: bool,
    pub fail_publish: bool,
}

#[allow(dead_code)]
impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes as `(topic, payload)` string slices, for easy comparison.
    pub fn sent(&self) -> Vec<(&str, &str)> {
        self.published
            .iter()
            .map(|(t, p)| (t.as_str(), p.as_str()))
            .collect()
    }

    /// Most recent payload published on `topic`.
    pub fn last_on(&self, topic: &str) -> Option<&str> {
        self.published
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.published.clear();
    }
}

impl MqttClientPort for MockClient {
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        if self.fail_subscribe {
            return Err(TransportError::SubscribeFailed);
        }
        self.subscriptions.push(topic.to_owned());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::PublishFailed);
        }
        self.published.push((
            topic.to_owned(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
