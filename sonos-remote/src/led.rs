//! Status LED signalling
//!
//! The remote has a single LED. Solid means the last request went through,
//! blinking means a transient failure, and off means the server has been
//! unreachable for several attempts in a row.

use std::fmt;

use tracing::info;

use crate::state::ControllerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedSignal {
    Solid,
    Blink,
    Off,
}

impl LedSignal {
    /// Pick the LED signal for a request outcome
    ///
    /// `connection_failures` counts consecutive connection failures
    /// including this one.
    pub fn for_status(
        status: ControllerStatus,
        connection_failures: u32,
        disconnect_threshold: u32,
    ) -> Self {
        match status {
            ControllerStatus::Ok => LedSignal::Solid,
            ControllerStatus::TimedOut | ControllerStatus::UnexpectedResponse => LedSignal::Blink,
            ControllerStatus::ConnectionFailed => {
                if connection_failures >= disconnect_threshold {
                    LedSignal::Off
                } else {
                    LedSignal::Blink
                }
            }
        }
    }
}

impl fmt::Display for LedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedSignal::Solid => write!(f, "solid"),
            LedSignal::Blink => write!(f, "blink"),
            LedSignal::Off => write!(f, "off"),
        }
    }
}

/// Something that can display an [`LedSignal`]
///
/// On hardware this drives the GPIO pin; elsewhere it can log or record.
pub trait StatusIndicator {
    fn show(&mut self, signal: LedSignal);
}

/// Indicator that reports signal changes through tracing
#[derive(Debug)]
pub struct LogIndicator {
    pin: u8,
    current: Option<LedSignal>,
}

impl LogIndicator {
    pub fn new(pin: u8) -> Self {
        Self { pin, current: None }
    }

    pub fn current(&self) -> Option<LedSignal> {
        self.current
    }
}

impl StatusIndicator for LogIndicator {
    fn show(&mut self, signal: LedSignal) {
        if self.current != Some(signal) {
            info!(pin = self.pin, led = %signal, "LED changed");
            self.current = Some(signal);
        }
    }
}

/// Indicator that keeps every signal it was asked to show
#[derive(Debug, Default, Clone)]
pub struct RecordingIndicator {
    pub history: Vec<LedSignal>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<LedSignal> {
        self.history.last().copied()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn show(&mut self, signal: LedSignal) {
        self.history.push(signal);
    }
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for Box<T> {
    fn show(&mut self, signal: LedSignal) {
        (**self).show(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_is_solid() {
        assert_eq!(LedSignal::for_status(ControllerStatus::Ok, 0, 3), LedSignal::Solid);
    }

    #[test]
    fn test_transient_failures_blink() {
        assert_eq!(
            LedSignal::for_status(ControllerStatus::TimedOut, 5, 3),
            LedSignal::Blink
        );
        assert_eq!(
            LedSignal::for_status(ControllerStatus::UnexpectedResponse, 0, 3),
            LedSignal::Blink
        );
        assert_eq!(
            LedSignal::for_status(ControllerStatus::ConnectionFailed, 1, 3),
            LedSignal::Blink
        );
    }

    #[test]
    fn test_repeated_connection_failures_turn_led_off() {
        assert_eq!(
            LedSignal::for_status(ControllerStatus::ConnectionFailed, 3, 3),
            LedSignal::Off
        );
        assert_eq!(
            LedSignal::for_status(ControllerStatus::ConnectionFailed, 10, 3),
            LedSignal::Off
        );
    }

    #[test]
    fn test_log_indicator_tracks_current() {
        let mut led = LogIndicator::new(5);
        assert_eq!(led.current(), None);
        led.show(LedSignal::Blink);
        led.show(LedSignal::Solid);
        assert_eq!(led.current(), Some(LedSignal::Solid));
    }

    #[test]
    fn test_recording_indicator() {
        let mut led = RecordingIndicator::new();
        led.show(LedSignal::Solid);
        led.show(LedSignal::Off);
        assert_eq!(led.history, vec![LedSignal::Solid, LedSignal::Off]);
        assert_eq!(led.last(), Some(LedSignal::Off));
    }
}
