//! Startup configuration.
//!
//! Loaded once from a JSON file before the scheduler starts and immutable
//! afterwards. A missing file yields the defaults; a malformed file is a
//! startup error. A few fields can be overridden through `LATCHKEY_*`
//! environment variables, which is convenient for development and keeps the
//! secrets out of checked-in files.

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use latchkey_core::UnlockCode;

use crate::error::AppError;

/// WiFi station credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiConfig {
    /// Network name to associate with.
    pub ssid: String,

    /// WPA2 passphrase.
    pub password: String,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: "smartlock".to_string(),
            password: String::new(),
        }
    }
}

/// HTTP front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address the status page is served on.
    pub bind_addr: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:80".parse().unwrap_or_else(|_| {
                // Infallible for a literal, but avoid a panic path anyway.
                SocketAddr::from(([0, 0, 0, 0], 80))
            }),
        }
    }
}

/// BLE service settings.
///
/// The UUID defaults are the Nordic UART service layout the companion app
/// speaks: one notify characteristic (TX) and one encrypted-write
/// characteristic (RX).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleConfig {
    /// Advertised device name.
    pub device_name: String,

    /// Static numeric pairing PIN.
    pub static_pin: u32,

    /// GATT service UUID.
    pub service_uuid: Uuid,

    /// Notify characteristic (device to central).
    pub tx_characteristic: Uuid,

    /// Encrypted write characteristic (central to device).
    pub rx_characteristic: Uuid,
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            device_name: "Smart Lock".to_string(),
            static_pin: 123456,
            service_uuid: uuid::uuid!("6e400001-b5a3-f393-e0a9-e50e24dcca9e"),
            tx_characteristic: uuid::uuid!("6e400003-b5a3-f393-e0a9-e50e24dcca9e"),
            rx_characteristic: uuid::uuid!("6e400002-b5a3-f393-e0a9-e50e24dcca9e"),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wifi: WifiConfig,
    pub http: HttpConfig,
    pub ble: BleConfig,
    pub unlock_code: UnlockCode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wifi: WifiConfig::default(),
            http: HttpConfig::default(),
            ble: BleConfig::default(),
            unlock_code: UnlockCode::new(1234),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, then apply environment
    /// overrides.
    ///
    /// A missing file is not an error: the defaults are used. A present but
    /// unreadable or malformed file is.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an override variable holds an unparseable value.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
            serde_json::from_str(&raw)
                .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))?
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `LATCHKEY_*` environment overrides in place.
    fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(ssid) = std::env::var("LATCHKEY_WIFI_SSID") {
            self.wifi.ssid = ssid;
        }
        if let Ok(password) = std::env::var("LATCHKEY_WIFI_PASSWORD") {
            self.wifi.password = password;
        }
        if let Ok(addr) = std::env::var("LATCHKEY_HTTP_ADDR") {
            self.http.bind_addr = addr
                .parse()
                .map_err(|_| AppError::Config(format!("bad LATCHKEY_HTTP_ADDR '{addr}'")))?;
        }
        if let Ok(code) = std::env::var("LATCHKEY_UNLOCK_CODE") {
            self.unlock_code = UnlockCode::from_str(&code)
                .map_err(|e| AppError::Config(format!("bad LATCHKEY_UNLOCK_CODE: {e}")))?;
        }
        Ok(())
    }
}
