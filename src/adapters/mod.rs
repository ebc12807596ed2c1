//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                 |
//! |------------|--------------------|-----------------------------|
//! | `hardware` | PulsePort          | ESP32 GPIO pulse outputs    |
//! | `log_sink` | EventSink          | Serial log output           |
//! | `mqtt`     | EventSink          | Broker status topics        |
//! |            | (uses MqttClientPort) | `EspMqttClient`          |
//! | `time`     | —                  | ESP32 system timer          |
//! | `wifi`     | —                  | ESP-IDF Wi-Fi STA           |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub(crate) mod utils;
pub mod wifi;
