//! MQTT topic layout.
//!
//! Every topic is `<prefix>/<suffix>`; an empty prefix yields the bare
//! suffix. Four topics are consumed, four are published:
//!
//! | direction | suffix                | payloads                       |
//! |-----------|-----------------------|--------------------------------|
//! | in        | `light/switch`        | integer                        |
//! | in        | `light/effect`        | `color_loop` / `none`          |
//! | in        | `fan/set`             | `on` / `off`                   |
//! | in        | `fan/speed`           | `low` / `high` / `off`         |
//! | out       | `fan/speed_state`     | `off` / `high` / `low`         |
//! | out       | `fan/state`           | `off` / `on`                   |
//! | out       | `light/status`        | `0` / `1`                      |
//! | out       | `light/effect_status` | `none` / `color_loop`          |

pub const DEFAULT_PREFIX: &str = "homedic";

pub const LIGHT_SWITCH: &str = "light/switch";
pub const LIGHT_EFFECT: &str = "light/effect";
pub const FAN_SET: &str = "fan/set";
pub const FAN_SPEED: &str = "fan/speed";

pub const FAN_SPEED_STATE: &str = "fan/speed_state";
pub const FAN_STATE: &str = "fan/state";
pub const LIGHT_STATUS: &str = "light/status";
pub const LIGHT_EFFECT_STATUS: &str = "light/effect_status";

/// Fully-qualified topic names, built once from the configured prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub light_switch: String,
    pub light_effect: String,
    pub fan_set: String,
    pub fan_speed: String,
    pub fan_speed_state: String,
    pub fan_state: String,
    pub light_status: String,
    pub light_effect_status: String,
}

impl Topics {
    pub fn new(prefix: &str) -> Self {
        let join = |suffix: &str| {
            if prefix.is_empty() {
                suffix.to_owned()
            } else {
                format!("{prefix}/{suffix}")
            }
        };
        Self {
            light_switch: join(LIGHT_SWITCH),
            light_effect: join(LIGHT_EFFECT),
            fan_set: join(FAN_SET),
            fan_speed: join(FAN_SPEED),
            fan_speed_state: join(FAN_SPEED_STATE),
            fan_state: join(FAN_STATE),
            light_status: join(LIGHT_STATUS),
            light_effect_status: join(LIGHT_EFFECT_STATUS),
        }
    }

    /// Command topics, in subscription order.
    pub fn subscriptions(&self) -> [&str; 4] {
        [
            &self.light_switch,
            &self.light_effect,
            &self.fan_set,
            &self.fan_speed,
        ]
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
