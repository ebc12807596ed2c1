//! Homedic Bridge Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single-writer control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   MqttLink      Esp32Time      │
//! │  (PulsePort)       (EventSink)    (EventSink)   (uptime)       │
//! │  WifiLink          EspMqttPort (receiver thread → Inbound)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Debouncer · CommandRouter · fan + light controllers   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISRs → EdgeQueue (drained by the control loop)           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Result, bail};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use homedic::adapters::hardware::HardwareAdapter;
use homedic::adapters::mqtt::{Inbound, esp_impl};
use homedic::adapters::time::Esp32TimeAdapter;
use homedic::adapters::wifi::{self, WifiLink};
use homedic::bridge::Bridge;
use homedic::config::BridgeConfig;
use homedic::drivers::hw_init::{self, GpioOutput};
use homedic::drivers::pulse::PulseDriver;
use homedic::drivers::status_led::StatusIndicator;
use homedic::events::EDGE_QUEUE;
use homedic::pins;

/// How long boot waits for the broker before publishing anyway.
const BOOT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Homedic bridge v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = BridgeConfig::from_build_env()?;
    config.validate_for_station()?;
    info!(
        "Config: broker={} client_id={} prefix='{}' pulse={}+{}ms debounce={}ms",
        config.mqtt_url,
        config.client_id,
        config.topic_prefix,
        config.pulse_on_ms,
        config.pulse_off_ms,
        config.debounce_ms
    );

    // ── 2. Initialise GPIO and button interrupts ──────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the pulse outputs there is nothing this firmware can do.
        error!("GPIO init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, continuing without buttons", e);
    }

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi_link = WifiLink::new(wifi::connect_station(peripherals.modem, sysloop, nvs, &config)?);

    let (client, rx) = esp_impl::connect(&config)?;

    // ── 4. Build the bridge and run the boot sequence ─────────
    let hw = HardwareAdapter::new(
        PulseDriver::new(
            GpioOutput::new(pins::FAN_PULSE_GPIO),
            FreeRtos,
            config.pulse_on_ms,
            config.pulse_off_ms,
        ),
        PulseDriver::new(
            GpioOutput::new(pins::LIGHT_PULSE_GPIO),
            FreeRtos,
            config.pulse_on_ms,
            config.pulse_off_ms,
        ),
        // hw_init leaves the active-low LED driven low, i.e. lit.
        StatusIndicator::new(GpioOutput::new(pins::STATUS_LED_GPIO), true),
    );
    let mut bridge = Bridge::new(&config, hw, client);
    let time = Esp32TimeAdapter::new();

    wait_for_broker(&mut bridge, &rx, &time)?;
    bridge.start();
    if let Err(e) = bridge.hw_mut().clear_status_indicator() {
        warn!("Status indicator: {}", e);
    }

    // ── 5. Control loop ───────────────────────────────────────
    let poll = Duration::from_millis(u64::from(config.loop_poll_ms));
    info!("Entering control loop (poll {} ms)", config.loop_poll_ms);
    loop {
        match rx.recv_timeout(poll) {
            Ok(item) => bridge.on_inbound(item, time.uptime_ms()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("MQTT receiver thread stopped"),
        }
        bridge.service_edges(&EDGE_QUEUE);
        let now = time.uptime_ms();
        wifi_link.poll(now);
        bridge.poll(now);
    }
}

/// Block until the broker session is up (or the boot timeout passes) so
/// the first status publish is not lost. Subscribes on connect.
fn wait_for_broker<H, C>(
    bridge: &mut Bridge<H, C>,
    rx: &Receiver<Inbound>,
    time: &Esp32TimeAdapter,
) -> Result<()>
where
    H: homedic::app::ports::PulsePort,
    C: homedic::app::ports::MqttClientPort,
{
    match rx.recv_timeout(BOOT_CONNECT_TIMEOUT) {
        Ok(Inbound::Connected) => {
            bridge.link_mut().on_connected(time.uptime_ms());
        }
        Ok(other) => {
            // Nothing is subscribed yet, so this can only be a disconnect.
            warn!("Broker: unexpected {:?} before connect", other);
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                "Broker not reachable after {:?}; status will be republished on connect",
                BOOT_CONNECT_TIMEOUT
            );
        }
        Err(RecvTimeoutError::Disconnected) => bail!("MQTT receiver thread stopped"),
    }
    Ok(())
}
