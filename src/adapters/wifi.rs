//! Wi-Fi station-mode adapter.
//!
//! `connect_station` brings the station interface up with the configured
//! credentials and blocks until it has an address. The broker client
//! cannot start without it, so there is nothing useful to do meanwhile.
//!
//! After boot, [`WifiLink`] watches the station from the control loop.
//! The ESP-IDF driver does not re-associate on its own, so a lost link is
//! re-joined from [`WifiLink::poll`]; the MQTT client reconnects on top.
//!
//! ## Reconnection policy
//!
//! Every failed association waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) before the next attempt. The first attempt after
//! a drop is immediate. A success resets the schedule.

use log::{info, warn};

use crate::adapters::utils::Backoff;
use crate::app::ports::StationPort;

#[cfg(target_os = "espidf")]
pub use esp_impl::{EspStation, connect_station};

/// Backoff applied between failed association attempts.
pub const RETRY_INITIAL_MS: u32 = 2_000;
pub const RETRY_MAX_MS: u32 = 60_000;

/// Keeps the station associated after boot.
pub struct WifiLink<S> {
    station: S,
    up: bool,
    backoff: Backoff,
    retry_at_ms: u32,
    attempt: u32,
    reconnects: u32,
}

impl<S: StationPort> WifiLink<S> {
    /// Wrap a station that is already associated (after `connect_station`).
    pub fn new(station: S) -> Self {
        Self {
            station,
            up: true,
            backoff: Backoff::new(RETRY_INITIAL_MS, RETRY_MAX_MS),
            retry_at_ms: 0,
            attempt: 0,
            reconnects: 0,
        }
    }

    /// Notice a dropped link and re-associate once the backoff allows.
    /// `now_ms` is wrapping milliseconds since boot.
    pub fn poll(&mut self, now_ms: u32) {
        if self.station.is_connected() {
            if !self.up {
                info!("WiFi: link back up");
                self.mark_up();
            }
            return;
        }

        if self.up {
            warn!("WiFi: connection lost, reconnecting");
            self.up = false;
            self.attempt = 0;
            self.backoff.reset();
            self.retry_at_ms = now_ms;
        }

        if (now_ms.wrapping_sub(self.retry_at_ms) as i32) < 0 {
            return;
        }

        self.attempt += 1;
        match self.station.connect() {
            Ok(()) => {
                info!("WiFi: reconnected (attempt {})", self.attempt);
                self.reconnects = self.reconnects.wrapping_add(1);
                self.mark_up();
            }
            Err(e) => {
                let delay = self.backoff.next_delay_ms();
                warn!(
                    "WiFi: reconnect attempt {} failed: {}, retry in {} ms",
                    self.attempt, e, delay
                );
                self.retry_at_ms = now_ms.wrapping_add(delay);
            }
        }
    }

    fn mark_up(&mut self) {
        self.up = true;
        self.attempt = 0;
        self.backoff.reset();
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Successful re-associations since boot.
    pub fn reconnects(&self) -> u32 {
        self.reconnects
    }

    pub fn station(&self) -> &S {
        &self.station
    }

    pub fn station_mut(&mut self) -> &mut S {
        &mut self.station
    }
}

#[cfg(target_os = "espidf")]
mod esp_impl {
    use anyhow::anyhow;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{RETRY_INITIAL_MS, RETRY_MAX_MS};
    use crate::adapters::utils::Backoff;
    use crate::app::ports::StationPort;
    use crate::config::BridgeConfig;
    use crate::error::TransportError;

    /// The ESP-IDF station behind [`StationPort`].
    pub struct EspStation {
        wifi: BlockingWifi<EspWifi<'static>>,
    }

    impl StationPort for EspStation {
        fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
        }

        fn connect(&mut self) -> Result<(), TransportError> {
            self.wifi
                .connect()
                .and_then(|()| self.wifi.wait_netif_up())
                .map_err(|e| {
                    warn!("WiFi: {}", e);
                    // Leave the driver idle so the next attempt starts clean.
                    let _ = self.wifi.disconnect();
                    TransportError::ConnectFailed
                })
        }
    }

    /// Associate with the configured access point, retrying until it
    /// succeeds. Configuration errors are returned immediately.
    pub fn connect_station(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &BridgeConfig,
    ) -> anyhow::Result<EspStation> {
        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

        let auth_method = if config.wifi_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("wifi_ssid too long"))?,
            password: config
                .wifi_password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("wifi_password too long"))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;

        let mut station = EspStation { wifi };
        let mut backoff = Backoff::new(RETRY_INITIAL_MS, RETRY_MAX_MS);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match station.connect() {
                Ok(()) => break,
                Err(e) => {
                    let delay = backoff.next_delay_ms();
                    warn!(
                        "WiFi: connect to '{}' failed (attempt {}): {}, retry in {} ms",
                        config.wifi_ssid, attempt, e, delay
                    );
                    FreeRtos::delay_ms(delay);
                }
            }
        }

        let ip = station.wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi: connected to '{}' as {} (attempt {})", config.wifi_ssid, ip.ip, attempt);
        Ok(station)
    }
}
