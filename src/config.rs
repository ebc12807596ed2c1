//! Bridge configuration parameters
//!
//! All tunable parameters for the bridge. Defaults match the stock
//! appliance; the broker address and Wi-Fi credentials are baked in at
//! build time through environment variables:
//!
//! - `HOMEDIC_CONFIG_JSON` — a full or partial JSON document (missing
//!   fields keep their defaults)
//! - `HOMEDIC_MQTT_URL`, `HOMEDIC_WIFI_SSID`, `HOMEDIC_WIFI_PASS` —
//!   single-field overrides applied on top

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::adapters::utils::is_printable_ascii;
use crate::drivers::button::DEFAULT_DEBOUNCE_MS;
use crate::drivers::pulse::{DEFAULT_PULSE_OFF_MS, DEFAULT_PULSE_ON_MS};
use crate::topics::{DEFAULT_PREFIX, Topics};

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Broker ---
    /// Broker URL, `mqtt://host:port` or `mqtts://host:port`
    pub mqtt_url: String,
    /// MQTT client identifier
    pub client_id: String,
    /// Prefix for every command and status topic (empty = none)
    pub topic_prefix: String,

    // --- Wi-Fi ---
    pub wifi_ssid: String,
    /// Empty for an open network
    pub wifi_password: String,

    // --- Appliance timing ---
    /// How long the simulated button is held down (milliseconds)
    pub pulse_on_ms: u32,
    /// Gap after releasing the simulated button (milliseconds)
    pub pulse_off_ms: u32,
    /// Edges closer than this to the previous edge are bounce (milliseconds)
    pub debounce_ms: u32,

    // --- Control loop ---
    /// Longest the loop waits for a message before servicing buttons (milliseconds)
    pub loop_poll_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mqtt_url: "mqtt://homeassistant.local:1883".into(),
            client_id: "homedic".into(),
            topic_prefix: DEFAULT_PREFIX.into(),

            wifi_ssid: String::new(),
            wifi_password: String::new(),

            pulse_on_ms: DEFAULT_PULSE_ON_MS,
            pulse_off_ms: DEFAULT_PULSE_OFF_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,

            loop_poll_ms: 20,
        }
    }
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Corrupted,
    /// No Wi-Fi SSID was baked in; the station has nothing to join.
    NoCredentials,
    /// A field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl BridgeConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)
    }

    /// Configuration baked in at build time (see module docs).
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut config = match option_env!("HOMEDIC_CONFIG_JSON") {
            Some(json) => Self::from_json(json)?,
            None => Self::default(),
        };
        if let Some(url) = option_env!("HOMEDIC_MQTT_URL") {
            config.mqtt_url = url.into();
        }
        if let Some(ssid) = option_env!("HOMEDIC_WIFI_SSID") {
            config.wifi_ssid = ssid.into();
        }
        if let Some(pass) = option_env!("HOMEDIC_WIFI_PASS") {
            config.wifi_password = pass.into();
        }
        Ok(config)
    }

    /// Reject values the firmware cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mqtt_url.starts_with("mqtt://") || self.mqtt_url.starts_with("mqtts://")) {
            return Err(ConfigError::ValidationFailed(
                "mqtt_url must start with mqtt:// or mqtts://",
            ));
        }
        if self.mqtt_url.ends_with("://") {
            return Err(ConfigError::ValidationFailed("mqtt_url has no host"));
        }
        if self.client_id.is_empty() || self.client_id.len() > 23 {
            return Err(ConfigError::ValidationFailed(
                "client_id must be 1-23 bytes",
            ));
        }
        if self.topic_prefix.contains(['+', '#']) || self.topic_prefix.ends_with('/') {
            return Err(ConfigError::ValidationFailed(
                "topic_prefix must not contain wildcards or a trailing '/'",
            ));
        }
        if self.wifi_ssid.len() > 32 || !is_printable_ascii(&self.wifi_ssid) {
            return Err(ConfigError::ValidationFailed(
                "wifi_ssid must be at most 32 printable ASCII bytes",
            ));
        }
        if !self.wifi_password.is_empty()
            && (self.wifi_password.len() < 8 || self.wifi_password.len() > 64)
        {
            return Err(ConfigError::ValidationFailed(
                "wifi_password must be 8-64 bytes, or empty for open",
            ));
        }
        if self.pulse_on_ms == 0 || self.pulse_off_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "pulse timings must be non-zero",
            ));
        }
        if self.loop_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop_poll_ms must be non-zero"));
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus the checks that only matter
    /// once the station has to associate with a real access point.
    pub fn validate_for_station(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.wifi_ssid.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        Ok(())
    }

    pub fn topics(&self) -> Topics {
        Topics::new(&self.topic_prefix)
    }
}
