//! Inbound commands to the application service.
//!
//! MQTT messages are decoded into an [`AppCommand`] exactly once, at the
//! messaging boundary. Everything past this point matches on the enum
//! instead of comparing topic strings.

use crate::error::CommandError;
use crate::topics::Topics;

/// Requested light effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ColorLoop,
    None,
}

/// Requested fan power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    On,
    Off,
}

/// Requested fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Low,
    High,
    Off,
}

/// Commands that the broker can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// `light/switch`: raw integer, reduced onto the ring by the router.
    LightSwitch(i64),

    /// `light/effect`
    LightEffect(Effect),

    /// `fan/set`
    FanPower(Power),

    /// `fan/speed`
    FanSpeed(Speed),
}

impl AppCommand {
    /// Decode one inbound message. Surrounding ASCII whitespace in the
    /// payload is ignored.
    pub fn decode(topics: &Topics, topic: &str, payload: &[u8]) -> Result<Self, CommandError> {
        // Resolve the topic first so an unknown topic never reports a
        // payload error.
        let kind = if topic == topics.light_switch {
            Kind::LightSwitch
        } else if topic == topics.light_effect {
            Kind::LightEffect
        } else if topic == topics.fan_set {
            Kind::FanPower
        } else if topic == topics.fan_speed {
            Kind::FanSpeed
        } else {
            return Err(CommandError::UnknownTopic);
        };

        let text = core::str::from_utf8(payload)
            .map_err(|_| CommandError::InvalidUtf8)?
            .trim_ascii();

        match kind {
            Kind::LightSwitch => text
                .parse::<i64>()
                .map(Self::LightSwitch)
                .map_err(|_| CommandError::InvalidPayload),
            Kind::LightEffect => match text {
                "color_loop" => Ok(Self::LightEffect(Effect::ColorLoop)),
                "none" => Ok(Self::LightEffect(Effect::None)),
                _ => Err(CommandError::InvalidPayload),
            },
            Kind::FanPower => match text {
                "on" => Ok(Self::FanPower(Power::On)),
                "off" => Ok(Self::FanPower(Power::Off)),
                _ => Err(CommandError::InvalidPayload),
            },
            Kind::FanSpeed => match text {
                "low" => Ok(Self::FanSpeed(Speed::Low)),
                "high" => Ok(Self::FanSpeed(Speed::High)),
                "off" => Ok(Self::FanSpeed(Speed::Off)),
                _ => Err(CommandError::InvalidPayload),
            },
        }
    }
}

#[derive(Clone, Copy)]
enum Kind {
    LightSwitch,
    LightEffect,
    FanPower,
    FanSpeed,
}
