//! The one-button toggle controller
//!
//! [`RemoteToggleController`] keeps a best-effort local copy of the room's
//! playback state, flips it when the button is pressed, and reflects the
//! outcome on the status LED. Every network call blocks the caller until a
//! response or the timeout; nothing is retried synchronously, so a failed
//! press is retried only by the next press or the next poll.

use std::time::{Duration, Instant};

use remote_client::{HttpClient, HttpResponse};
use tracing::{debug, info, warn};

use crate::config::RemoteConfig;
use crate::endpoints::DeviceEndpointSet;
use crate::error::ConfigError;
use crate::led::{LedSignal, LogIndicator, StatusIndicator};
use crate::reconnect::{Backoff, BackoffConfig};
use crate::response::{check_command_body, parse_state_body};
use crate::state::{ControllerStatus, PlaybackState};
use crate::transport::Transport;

/// Tunables for a controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Minimum time between background state refreshes
    pub poll_interval: Duration,
    /// Consecutive connection failures before the LED goes dark
    pub disconnect_threshold: u32,
    /// Backoff applied to background polls after network failures
    pub backoff: BackoffConfig,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            disconnect_threshold: 3,
            backoff: BackoffConfig::default(),
        }
    }
}

impl From<&RemoteConfig> for ControllerSettings {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            disconnect_threshold: config.timing.disconnect_threshold,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Controller for one room on the control API
///
/// The controller owns its transport, and every network operation takes
/// `&mut self`, so at most one request is ever in flight.
pub struct RemoteToggleController<T: Transport, L: StatusIndicator> {
    endpoints: DeviceEndpointSet,
    transport: T,
    indicator: L,
    settings: ControllerSettings,
    state: PlaybackState,
    last_status: Option<ControllerStatus>,
    backoff: Backoff,
    connection_failures: u32,
    last_refresh: Option<Instant>,
    requests_issued: u64,
}

impl RemoteToggleController<HttpClient, LogIndicator> {
    /// Build a controller wired to the real HTTP client and a logging LED
    pub fn from_config(config: &RemoteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoints = config.endpoints()?;
        let transport = HttpClient::with_timeout(config.request_timeout());
        let indicator = LogIndicator::new(config.led.pin);

        Ok(Self::with_settings(
            endpoints,
            transport,
            indicator,
            ControllerSettings::from(config),
        ))
    }
}

impl<T: Transport, L: StatusIndicator> RemoteToggleController<T, L> {
    pub fn new(endpoints: DeviceEndpointSet, transport: T, indicator: L) -> Self {
        Self::with_settings(endpoints, transport, indicator, ControllerSettings::default())
    }

    pub fn with_settings(
        endpoints: DeviceEndpointSet,
        transport: T,
        indicator: L,
        settings: ControllerSettings,
    ) -> Self {
        let backoff = Backoff::new(settings.backoff.clone());
        Self {
            endpoints,
            transport,
            indicator,
            settings,
            state: PlaybackState::Unknown,
            last_status: None,
            backoff,
            connection_failures: 0,
            last_refresh: None,
            requests_issued: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Outcome of the most recent operation, `None` before the first one
    pub fn last_status(&self) -> Option<ControllerStatus> {
        self.last_status
    }

    pub fn endpoints(&self) -> &DeviceEndpointSet {
        &self.endpoints
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Total HTTP requests issued since construction
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    /// Network failures (timeouts and refusals) since the last response
    pub fn consecutive_failures(&self) -> u32 {
        self.backoff.consecutive_failures()
    }

    /// Connection failures in a row; any other outcome resets the count
    pub fn connection_failures(&self) -> u32 {
        self.connection_failures
    }

    /// Ask the server for the current playback state
    ///
    /// On any failure the previously known state is returned unchanged
    /// alongside the failure status.
    pub fn query_state(&mut self) -> (PlaybackState, ControllerStatus) {
        let status = self.refresh_state();
        self.last_status = Some(status);
        (self.state, status)
    }

    /// Flip playback: pause when playing, otherwise play the configured station
    ///
    /// An unknown state is refreshed first. If that refresh hits a network
    /// failure the toggle stops there rather than spending a second blocking
    /// request against an unreachable server.
    pub fn toggle_playback(&mut self) -> ControllerStatus {
        if self.state == PlaybackState::Unknown {
            let (_, status) = self.query_state();
            if status.is_network_failure() {
                return status;
            }
        }

        let (path, target) = match self.state {
            PlaybackState::Playing => (self.endpoints.pause_url().to_string(), PlaybackState::Paused),
            PlaybackState::Paused | PlaybackState::Unknown => {
                (self.endpoints.play_url().to_string(), PlaybackState::Playing)
            }
        };

        let status = match self.request(&path) {
            Ok(response) => match check_command_body(&response.body) {
                Ok(()) => {
                    info!(
                        station = self.endpoints.station_name(),
                        from = %self.state,
                        to = %target,
                        "playback toggled"
                    );
                    self.state = target;
                    ControllerStatus::Ok
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "command response did not confirm");
                    ControllerStatus::UnexpectedResponse
                }
            },
            Err(status) => status,
        };

        self.last_status = Some(status);
        status
    }

    /// Entry point for a debounced button press
    pub fn on_button_press(&mut self) -> LedSignal {
        debug!(state = %self.state, "button pressed");
        let status = self.toggle_playback();
        self.show(status)
    }

    /// Refresh the state in the background if it is due
    ///
    /// Returns `None` when the poll interval has not elapsed since the last
    /// refresh, or when backoff after network failures says to wait.
    pub fn poll(&mut self) -> Option<ControllerStatus> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<ControllerStatus> {
        if let Some(last) = self.last_refresh {
            if now.saturating_duration_since(last) < self.settings.poll_interval {
                return None;
            }
        }

        if !self.backoff.should_attempt_at(now) {
            debug!(
                failures = self.backoff.consecutive_failures(),
                delay_ms = self.backoff.current_delay().as_millis() as u64,
                "poll skipped during backoff"
            );
            return None;
        }

        let (_, status) = self.query_state();
        self.show(status);
        Some(status)
    }

    /// Drive the LED for `status` and return the signal shown
    fn show(&mut self, status: ControllerStatus) -> LedSignal {
        let signal = LedSignal::for_status(
            status,
            self.connection_failures,
            self.settings.disconnect_threshold,
        );
        self.indicator.show(signal);
        signal
    }

    fn refresh_state(&mut self) -> ControllerStatus {
        let path = self.endpoints.state_url().to_string();
        self.last_refresh = Some(Instant::now());

        let response = match self.request(&path) {
            Ok(response) => response,
            Err(status) => return status,
        };

        match parse_state_body(&response.body) {
            Ok(report) => {
                if !report.station_matches(self.endpoints.station_name()) {
                    debug!(
                        expected = self.endpoints.station_name(),
                        loaded = report.station.as_deref().unwrap_or(""),
                        "a different station is loaded"
                    );
                }
                if report.playback_state != self.state {
                    debug!(from = %self.state, to = %report.playback_state, "state refreshed");
                }
                self.state = report.playback_state;
                ControllerStatus::Ok
            }
            Err(e) => {
                warn!(error = %e, "state response not understood");
                ControllerStatus::UnexpectedResponse
            }
        }
    }

    /// Issue one GET and fold transport failures and non-2xx codes into a status
    fn request(&mut self, path: &str) -> Result<HttpResponse, ControllerStatus> {
        let url = self.endpoints.url_for(path);
        self.requests_issued += 1;

        match self.transport.get(&url) {
            Ok(response) => {
                self.backoff.record_success();
                self.connection_failures = 0;
                if response.is_success() {
                    Ok(response)
                } else {
                    warn!(url = %url, status = response.status, "server returned an error status");
                    Err(ControllerStatus::UnexpectedResponse)
                }
            }
            Err(e) => {
                let status = ControllerStatus::from(&e);
                if status == ControllerStatus::ConnectionFailed {
                    self.connection_failures = self.connection_failures.saturating_add(1);
                } else {
                    self.connection_failures = 0;
                }
                if status.is_network_failure() {
                    self.backoff.record_failure();
                } else {
                    self.backoff.record_success();
                }
                warn!(
                    url = %url,
                    error = %e,
                    failures = self.backoff.consecutive_failures(),
                    "request failed"
                );
                Err(status)
            }
        }
    }
}
