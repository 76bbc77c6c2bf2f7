//! Parsing of control API response bodies
//!
//! The state endpoint answers with the API's JSON state document
//! (`{"playbackState":"PLAYING","currentTrack":{...},...}`), though a bare
//! transport-state word such as `PAUSED` is accepted too. Command endpoints
//! answer `{"status":"success"}` or an error document.

use serde::Deserialize;
use thiserror::Error;

use crate::state::PlaybackState;

/// Ways a 2xx body can fail the API contract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Empty response body")]
    Empty,

    #[error("Malformed JSON: {0}")]
    Malformed(String),

    #[error("Response has no playbackState field")]
    MissingPlaybackState,

    #[error("Unrecognized playback state: {0}")]
    UnrecognizedState(String),

    #[error("Command rejected by server: {0}")]
    Rejected(String),
}

/// What a successful state query told us
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateReport {
    pub playback_state: PlaybackState,
    /// Station or track title currently loaded, when the server reports one
    pub station: Option<String>,
}

impl StateReport {
    /// Whether the loaded station looks like the configured one
    ///
    /// Reports without station information are treated as matching.
    pub fn station_matches(&self, station_name: &str) -> bool {
        match &self.station {
            Some(station) => station
                .to_lowercase()
                .contains(&station_name.trim().to_lowercase()),
            None => true,
        }
    }
}

#[derive(Deserialize)]
struct StateDocument {
    #[serde(rename = "playbackState")]
    playback_state: Option<String>,
    #[serde(rename = "currentTrack", default)]
    current_track: Option<TrackDocument>,
}

#[derive(Deserialize)]
struct TrackDocument {
    #[serde(rename = "stationName")]
    station_name: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct CommandDocument {
    status: Option<String>,
    error: Option<String>,
}

/// Parse the body returned by the state endpoint
pub fn parse_state_body(body: &str) -> Result<StateReport, ResponseError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ResponseError::Empty);
    }

    if trimmed.starts_with('{') {
        let document: StateDocument = serde_json::from_str(trimmed)
            .map_err(|e| ResponseError::Malformed(e.to_string()))?;

        let raw_state = document
            .playback_state
            .ok_or(ResponseError::MissingPlaybackState)?;
        let playback_state = PlaybackState::from_transport_state(&raw_state)
            .ok_or(ResponseError::UnrecognizedState(raw_state))?;

        // Radio streams report the station in stationName; fall back to title
        let station = document.current_track.and_then(|track| {
            track
                .station_name
                .filter(|s| !s.is_empty())
                .or(track.title)
                .filter(|s| !s.is_empty())
        });

        return Ok(StateReport {
            playback_state,
            station,
        });
    }

    let word = trimmed.trim_matches('"');
    let playback_state = PlaybackState::from_transport_state(word)
        .ok_or_else(|| ResponseError::UnrecognizedState(truncate(word)))?;

    Ok(StateReport {
        playback_state,
        station: None,
    })
}

/// Check the body returned by the play or pause endpoint
pub fn check_command_body(body: &str) -> Result<(), ResponseError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    if trimmed.starts_with('{') {
        let document: CommandDocument = serde_json::from_str(trimmed)
            .map_err(|e| ResponseError::Malformed(e.to_string()))?;

        return match document.status.as_deref() {
            None | Some("success") => Ok(()),
            Some(other) => Err(ResponseError::Rejected(
                document.error.unwrap_or_else(|| other.to_string()),
            )),
        };
    }

    match trimmed.trim_matches('"').to_lowercase().as_str() {
        "ok" | "success" => Ok(()),
        _ => Err(ResponseError::Malformed(truncate(trimmed))),
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 64;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
