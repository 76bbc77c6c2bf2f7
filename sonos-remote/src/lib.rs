//! # sonos-remote - one-button playback toggle
//!
//! Toggles a room between "playing the configured station" and "paused"
//! through the HTTP control API, and reports each outcome on a status LED:
//!
//! ```rust,no_run
//! use sonos_remote::{RemoteConfig, RemoteToggleController};
//!
//! let config = RemoteConfig::load_or_default()?;
//! let mut controller = RemoteToggleController::from_config(&config)?;
//!
//! // Wire this to the debounced button edge
//! let led = controller.on_button_press();
//! println!("now {} (LED {})", controller.state(), led);
//! # Ok::<(), sonos_remote::RemoteError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! remote-cli (main loop: button events, polling, Ctrl+C)
//!     ↓
//! RemoteToggleController (state, LED, backoff)
//!     ↓
//! Transport (remote-client HttpClient over ureq)
//! ```
//!
//! No operation on the controller fails: every outcome is a
//! [`ControllerStatus`], and the previous [`PlaybackState`] is kept whenever
//! the server's answer is missing or ambiguous.

pub mod button;
pub mod config;
pub mod controller;
pub mod endpoints;
pub mod error;
pub mod led;
pub mod logging;
pub mod reconnect;
pub mod response;
pub mod state;
pub mod transport;

pub use button::ButtonEvent;
pub use config::RemoteConfig;
pub use controller::{ControllerSettings, RemoteToggleController};
pub use endpoints::DeviceEndpointSet;
pub use error::{ConfigError, RemoteError};
pub use led::{LedSignal, LogIndicator, RecordingIndicator, StatusIndicator};
pub use state::{ControllerStatus, PlaybackState};
pub use transport::Transport;

pub use remote_client::{HttpClient, HttpError, HttpResponse};
