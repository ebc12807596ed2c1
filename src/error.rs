//! Error types for the bridge firmware.
//!
//! One small enum per concern. All are `Copy` so they can be passed
//! through the service layer without allocation; the binary's top level
//! folds them into `anyhow::Error`.

use core::fmt;

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Command decode errors
// ---------------------------------------------------------------------------

/// Why an inbound (topic, payload) pair was rejected. None of these change
/// appliance state or trigger a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Topic is not one of the subscribed command topics.
    UnknownTopic,
    /// Payload is not UTF-8 text.
    InvalidUtf8,
    /// Payload is text, but not a value this topic accepts.
    InvalidPayload,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTopic => write!(f, "unknown topic"),
            Self::InvalidUtf8 => write!(f, "payload is not UTF-8"),
            Self::InvalidPayload => write!(f, "unrecognised payload"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Mode conversion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    /// `value` is outside `[0, count)`.
    OutOfRange { value: i64, count: u8 },
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { value, count } => {
                write!(f, "mode {value} outside [0, {count})")
            }
        }
    }
}

impl std::error::Error for ModeError {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The Wi-Fi station could not (re)associate.
    ConnectFailed,
    SubscribeFailed,
    PublishFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "WiFi association failed"),
            Self::SubscribeFailed => write!(f, "MQTT subscribe failed"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
        }
    }
}

impl std::error::Error for TransportError {}
