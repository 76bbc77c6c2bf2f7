//! Playback state and request outcome types

use std::fmt;

use remote_client::HttpError;
use serde::{Deserialize, Serialize};

/// Locally known playback state of the controlled room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Currently playing audio
    Playing,
    /// Paused or stopped; the play URL resumes the station
    Paused,
    /// No successful state query has happened yet
    #[default]
    Unknown,
}

impl PlaybackState {
    /// Parse from a transport state string reported by the control API
    ///
    /// Handles the values the API reports:
    /// - "PLAYING"
    /// - "PAUSED_PLAYBACK" / "PAUSED"
    /// - "STOPPED"
    ///
    /// Returns `None` for anything else, including "TRANSITIONING", since a
    /// transitional state says nothing reliable about where playback ends up.
    pub fn from_transport_state(state: &str) -> Option<Self> {
        match state.trim().to_uppercase().as_str() {
            "PLAYING" => Some(PlaybackState::Playing),
            "PAUSED_PLAYBACK" | "PAUSED" | "STOPPED" => Some(PlaybackState::Paused),
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of the last network operation
///
/// Every controller operation resolves to one of these; nothing is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerStatus {
    Ok,
    /// No response before the request timeout
    TimedOut,
    /// DNS or connect failure
    ConnectionFailed,
    /// A response arrived but did not satisfy the API contract
    UnexpectedResponse,
}

impl ControllerStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ControllerStatus::Ok)
    }

    /// Failures caused by the network rather than by the server's answer
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            ControllerStatus::TimedOut | ControllerStatus::ConnectionFailed
        )
    }
}

impl From<&HttpError> for ControllerStatus {
    fn from(error: &HttpError) -> Self {
        match error {
            HttpError::Timeout(_) => ControllerStatus::TimedOut,
            HttpError::Connect(_) => ControllerStatus::ConnectionFailed,
            HttpError::Protocol(_) => ControllerStatus::UnexpectedResponse,
        }
    }
}

impl fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerStatus::Ok => write!(f, "ok"),
            ControllerStatus::TimedOut => write!(f, "timed out"),
            ControllerStatus::ConnectionFailed => write!(f, "connection failed"),
            ControllerStatus::UnexpectedResponse => write!(f, "unexpected response"),
        }
    }
}
