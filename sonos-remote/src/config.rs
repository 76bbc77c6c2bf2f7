//! Configuration for the remote
//!
//! Settings come from a TOML file with one table per concern:
//!
//! ```toml
//! [wifi]
//! ssid = "WIFI_SSID"
//! password = "WIFI_PSK"
//!
//! [server]
//! host = "192.168.1.20"
//! port = 5005
//!
//! [endpoints]
//! state_url = "/kitchen/state"
//! play_url = "/kitchen/tunein/play/34804"
//! pause_url = "/kitchen/pause"
//! station_name = "KQED-FM"
//!
//! [led]
//! pin = 5
//! ```
//!
//! Every table and key is optional; missing values fall back to the defaults
//! below.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoints::DeviceEndpointSet;
use crate::error::ConfigError;

/// Default port of the HTTP control API
pub const DEFAULT_HTTP_PORT: u16 = 5005;

const CONFIG_HEADER: &str = "# sonos-remote configuration\n\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub wifi: WifiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub led: LedConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Credentials handed to the WiFi stack
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifiConfig {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for WifiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Paths on the control API for the target room
///
/// To play a TuneIn station, put its numeric id after `/tunein/play/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_state_url")]
    pub state_url: String,
    #[serde(default = "default_play_url")]
    pub play_url: String,
    #[serde(default = "default_pause_url")]
    pub pause_url: String,
    #[serde(default = "default_station_name")]
    pub station_name: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            state_url: default_state_url(),
            play_url: default_play_url(),
            pause_url: default_pause_url(),
            station_name: default_station_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedConfig {
    /// GPIO pin driving the status LED
    #[serde(default = "default_led_pin")]
    pub pin: u8,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            pin: default_led_pin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Time allowed for each request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How often the state is refreshed without a button press
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Consecutive connection failures after which the LED goes dark
    #[serde(default = "default_disconnect_threshold")]
    pub disconnect_threshold: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            disconnect_threshold: default_disconnect_threshold(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    DEFAULT_HTTP_PORT
}
fn default_state_url() -> String {
    "/kitchen/state".into()
}
fn default_play_url() -> String {
    "/kitchen/tunein/play/34804".into()
}
fn default_pause_url() -> String {
    "/kitchen/pause".into()
}
fn default_station_name() -> String {
    "KQED-FM".into()
}
fn default_led_pin() -> u8 {
    5
}
fn default_request_timeout_ms() -> u64 {
    5_000
}
fn default_poll_interval_ms() -> u64 {
    30_000
}
fn default_disconnect_threshold() -> u32 {
    3
}

impl RemoteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/sonos-remote/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("sonos-remote").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when the file is absent
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RemoteConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("Failed to serialize config: {}", e)))?;
        Ok(format!("{}{}", CONFIG_HEADER, body))
    }

    /// Validate the configuration and return the first issue found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.timing.disconnect_threshold == 0 {
            return Err(ConfigError::Invalid(
                "Disconnect threshold must be at least 1".to_string(),
            ));
        }

        self.endpoints().map(|_| ())
    }

    /// Build the immutable endpoint set the controller runs against
    pub fn endpoints(&self) -> Result<DeviceEndpointSet, ConfigError> {
        DeviceEndpointSet::new(
            self.server.host.clone(),
            self.server.port,
            self.endpoints.state_url.clone(),
            self.endpoints.play_url.clone(),
            self.endpoints.pause_url.clone(),
            self.endpoints.station_name.clone(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timing.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.poll_interval_ms)
    }

    // Builder pattern methods for fluent configuration

    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server.host = host.into();
        self.server.port = port;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timing.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.timing.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_disconnect_threshold(mut self, threshold: u32) -> Self {
        self.timing.disconnect_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RemoteConfig::default();
        assert_eq!(config.server.port, 5005);
        assert_eq!(config.endpoints.state_url, "/kitchen/state");
        assert_eq!(config.endpoints.play_url, "/kitchen/tunein/play/34804");
        assert_eq!(config.endpoints.pause_url, "/kitchen/pause");
        assert_eq!(config.endpoints.station_name, "KQED-FM");
        assert_eq!(config.led.pin, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = RemoteConfig::from_toml_str(
            r#"
            [server]
            host = "10.0.0.7"

            [endpoints]
            play_url = "/office/tunein/play/1234"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "10.0.0.7");
        assert_eq!(config.server.port, 5005);
        assert_eq!(config.endpoints.play_url, "/office/tunein/play/1234");
        assert_eq!(config.endpoints.pause_url, "/kitchen/pause");
        assert_eq!(config.timing.disconnect_threshold, 3);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = RemoteConfig::from_toml_str("").unwrap();
        assert_eq!(config, RemoteConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let invalid = RemoteConfig::default().with_request_timeout(Duration::ZERO);
        assert!(invalid.validate().is_err());

        let invalid = RemoteConfig::default().with_disconnect_threshold(0);
        assert!(invalid.validate().is_err());

        let invalid = RemoteConfig::default().with_server("", 5005);
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = RemoteConfig::from_toml_str("[server\nhost = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let result = RemoteConfig::from_toml_str("[server]\nport = \"five\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let mut config = RemoteConfig::default();
        config.wifi.ssid = "home".into();
        config.wifi.password = "hunter2".into();

        let debug = format!("{:?}", config);
        assert!(debug.contains("home"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let config = RemoteConfig::default()
            .with_server("192.168.1.20", 5006)
            .with_poll_interval(Duration::from_secs(10));

        let text = config.to_toml_string().unwrap();
        assert!(text.starts_with("# sonos-remote"));
        assert_eq!(RemoteConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_endpoints_from_config() {
        let endpoints = RemoteConfig::default()
            .with_server("speaker-host", 5005)
            .endpoints()
            .unwrap();
        assert_eq!(endpoints.url_for(endpoints.state_url()), "http://speaker-host:5005/kitchen/state");
    }
}
