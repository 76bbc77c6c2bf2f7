//! Immutable description of the control server and the room's endpoints

use crate::error::ConfigError;

/// Where the control API lives and which paths drive the configured room
///
/// Built once at startup and handed to the controller; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpointSet {
    host: String,
    port: u16,
    state_url: String,
    play_url: String,
    pause_url: String,
    station_name: String,
}

impl DeviceEndpointSet {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        state_url: impl Into<String>,
        play_url: impl Into<String>,
        pause_url: impl Into<String>,
        station_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let endpoints = Self {
            host: host.into().trim().to_string(),
            port,
            state_url: state_url.into(),
            play_url: play_url.into(),
            pause_url: pause_url.into(),
            station_name: station_name.into(),
        };
        endpoints.validate()?;
        Ok(endpoints)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("Server host must not be empty".to_string()));
        }

        if self.host.contains("://") || self.host.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "Server host '{}' must be a bare hostname or IP address",
                self.host
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid("Server port must not be 0".to_string()));
        }

        for (name, path) in [
            ("state_url", &self.state_url),
            ("play_url", &self.play_url),
            ("pause_url", &self.pause_url),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "Endpoint {} must start with '/', got '{}'",
                    name, path
                )));
            }
        }

        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state_url(&self) -> &str {
        &self.state_url
    }

    pub fn play_url(&self) -> &str {
        &self.play_url
    }

    pub fn pause_url(&self) -> &str {
        &self.pause_url
    }

    /// Display label for the station, used only in logs
    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Absolute URL for one of the endpoint paths
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}
