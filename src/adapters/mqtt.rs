//! MQTT link adapter.
//!
//! [`MqttLink`] sits between the domain's [`EventSink`] port and a broker
//! client behind [`MqttClientPort`]:
//!
//! - status events become fire-and-forget publishes (QoS 0, not retained)
//! - every (re)connect re-subscribes the four command topics
//! - a failed subscribe is retried from [`MqttLink::poll`] with
//!   exponential backoff (1 s doubling, capped at 30 s)
//! - publishes while disconnected are dropped and counted; the control
//!   loop republishes both statuses on the next connect
//!
//! On ESP-IDF, [`esp_impl`] wraps `EspMqttClient` and runs the connection
//! on a receiver thread that forwards [`Inbound`] items over a channel.

use log::{info, warn};

use crate::adapters::utils::Backoff;
use crate::app::events::{AppEvent, status_messages};
use crate::app::ports::{EventSink, MqttClientPort};
use crate::error::TransportError;
use crate::topics::Topics;

const SUBSCRIBE_RETRY_INITIAL_MS: u32 = 1_000;
const SUBSCRIBE_RETRY_MAX_MS: u32 = 30_000;

/// What the receiver thread hands to the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Connected,
    Disconnected,
    Message { topic: String, payload: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

pub struct MqttLink<C> {
    client: C,
    topics: Topics,
    state: LinkState,
    subscribed: bool,
    backoff: Backoff,
    retry_at_ms: u32,
    publish_failures: u32,
    dropped: u32,
}

impl<C: MqttClientPort> MqttLink<C> {
    pub fn new(client: C, topics: Topics) -> Self {
        Self {
            client,
            topics,
            state: LinkState::Disconnected,
            subscribed: false,
            backoff: Backoff::new(SUBSCRIBE_RETRY_INITIAL_MS, SUBSCRIBE_RETRY_MAX_MS),
            retry_at_ms: 0,
            publish_failures: 0,
            dropped: 0,
        }
    }

    /// The broker session is (re)established. Subscribes immediately;
    /// returns `true` when all command topics are subscribed.
    pub fn on_connected(&mut self, now_ms: u32) -> bool {
        info!("mqtt: connected");
        self.state = LinkState::Connected;
        self.backoff.reset();
        self.subscribe_all(now_ms).is_ok()
    }

    pub fn on_disconnected(&mut self) {
        if self.state == LinkState::Connected {
            warn!("mqtt: disconnected");
        }
        self.state = LinkState::Disconnected;
        self.subscribed = false;
    }

    /// Retry a failed subscription once its backoff has elapsed.
    pub fn poll(&mut self, now_ms: u32) {
        if self.state == LinkState::Connected
            && !self.subscribed
            && (now_ms.wrapping_sub(self.retry_at_ms) as i32) >= 0
        {
            let _ = self.subscribe_all(now_ms);
        }
    }

    fn subscribe_all(&mut self, now_ms: u32) -> Result<(), TransportError> {
        for topic in self.topics.subscriptions() {
            if let Err(e) = self.client.subscribe(topic) {
                let delay = self.backoff.next_delay_ms();
                warn!("mqtt: subscribe {} failed: {}, retry in {} ms", topic, e, delay);
                self.subscribed = false;
                self.retry_at_ms = now_ms.wrapping_add(delay);
                return Err(e);
            }
        }
        info!("mqtt: subscribed to {} command topics", self.topics.subscriptions().len());
        self.subscribed = true;
        self.backoff.reset();
        Ok(())
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Publishes the client rejected while connected.
    pub fn publish_failures(&self) -> u32 {
        self.publish_failures
    }

    /// Publishes skipped because the link was down.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }
}

impl<C: MqttClientPort> EventSink for MqttLink<C> {
    fn emit(&mut self, event: &AppEvent) {
        for (topic, payload) in status_messages(&self.topics, event) {
            if self.state != LinkState::Connected {
                self.dropped = self.dropped.wrapping_add(1);
                continue;
            }
            if let Err(e) = self.client.publish(topic, payload.as_bytes()) {
                self.publish_failures = self.publish_failures.wrapping_add(1);
                warn!("mqtt: publish {}={} failed: {}", topic, payload, e);
            }
        }
    }
}

// ── ESP-IDF client ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub mod esp_impl {
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;

    use esp_idf_svc::mqtt::client::{
        Details, EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
    };
    use log::{debug, warn};

    use super::Inbound;
    use crate::app::ports::MqttClientPort;
    use crate::config::BridgeConfig;
    use crate::error::TransportError;

    const RX_STACK_SIZE: usize = 6 * 1024;

    /// `EspMqttClient` behind the broker client port.
    pub struct EspMqttPort {
        client: EspMqttClient<'static>,
    }

    impl MqttClientPort for EspMqttPort {
        fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
            self.client
                .subscribe(topic, QoS::AtMostOnce)
                .map(|_| ())
                .map_err(|_| TransportError::SubscribeFailed)
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            self.client
                .enqueue(topic, QoS::AtMostOnce, false, payload)
                .map(|_| ())
                .map_err(|_| TransportError::PublishFailed)
        }
    }

    /// Create the client and start the receiver thread. The ESP-IDF client
    /// reconnects on its own; every session change arrives as an
    /// [`Inbound`] item.
    pub fn connect(config: &BridgeConfig) -> anyhow::Result<(EspMqttPort, Receiver<Inbound>)> {
        let conf = MqttClientConfiguration {
            client_id: Some(config.client_id.as_str()),
            ..Default::default()
        };
        let (client, conn) = EspMqttClient::new(config.mqtt_url.as_str(), &conf)?;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("mqtt-rx".into())
            .stack_size(RX_STACK_SIZE)
            .spawn(move || receive_loop(conn, tx))?;

        Ok((EspMqttPort { client }, rx))
    }

    fn receive_loop(mut conn: EspMqttConnection, tx: Sender<Inbound>) {
        loop {
            let item = match conn.next() {
                Ok(event) => match event.payload() {
                    EventPayload::Connected(_) => Inbound::Connected,
                    EventPayload::Disconnected => Inbound::Disconnected,
                    EventPayload::Received {
                        topic: Some(topic),
                        data,
                        details: Details::Complete,
                        ..
                    } => Inbound::Message {
                        topic: topic.to_owned(),
                        payload: data.to_vec(),
                    },
                    other => {
                        debug!("mqtt-rx: {:?}", other);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("mqtt-rx: connection closed: {:?}", e);
                    return;
                }
            };
            if tx.send(item).is_err() {
                // Control loop gone.
                return;
            }
        }
    }
}
