//! Error types for the HTTP client

use std::io;

use thiserror::Error;

/// Errors that can occur while talking to the control API
///
/// A response with a non-2xx status is not an error at this level; it is
/// returned as an [`HttpResponse`](crate::HttpResponse) so callers can decide.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No response arrived before the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// DNS resolution failed, the connection was refused, or it dropped
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The server answered with something that is not valid HTTP,
    /// or the request could not be formed
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl HttpError {
    /// Classify an I/O error surfaced while reading a response
    pub fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                HttpError::Timeout(error.to_string())
            }
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => HttpError::Connect(error.to_string()),
            _ => HttpError::Protocol(error.to_string()),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }
}
