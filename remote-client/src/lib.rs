//! Private HTTP client for the speaker control API
//!
//! This crate provides a minimal blocking client for the plain-HTTP control
//! service that commands the speakers (`GET http://host:port/<room>/<action>`).
//! Every call blocks the caller until a response arrives or the timeout
//! fires, and transport failures are classified so callers can tell a slow
//! server from an unreachable one.

mod error;

pub use error::HttpError;

use std::time::Duration;

use tracing::{debug, trace};

/// Default time allowed for a whole request (connect, send, and read)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A response received from the server, whatever its status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A minimal HTTP client for the control API
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client with the default 5 second timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client whose connect and read phases share `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout_read(timeout)
                .timeout(timeout)
                .redirects(0)
                .build(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a GET request and return the response
    ///
    /// Non-2xx responses are returned as `Ok` with their status code; only
    /// transport-level failures are errors.
    pub fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        trace!(url, "GET");

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                debug!(url, status, "server returned non-success status");
                let body = response.into_string().unwrap_or_default();
                return Ok(HttpResponse::new(status, body));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(classify_transport(&transport));
            }
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| HttpError::from_io(&e))?;

        Ok(HttpResponse::new(status, body))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a ureq transport failure onto the client's error taxonomy
fn classify_transport(transport: &ureq::Transport) -> HttpError {
    let message = transport.to_string();

    let io_error = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>());
    if let Some(io_error) = io_error {
        if let HttpError::Timeout(_) = HttpError::from_io(io_error) {
            return HttpError::Timeout(message);
        }
    }
    if message.contains("timed out") {
        return HttpError::Timeout(message);
    }

    match transport.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => HttpError::Connect(message),
        ureq::ErrorKind::Io => match io_error {
            Some(io_error) => match HttpError::from_io(io_error) {
                HttpError::Protocol(_) => HttpError::Protocol(message),
                _ => HttpError::Connect(message),
            },
            None => HttpError::Connect(message),
        },
        _ => HttpError::Protocol(message),
    }
}
