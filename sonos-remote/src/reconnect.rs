//! Exponential backoff for periodic polling after network failures.
//!
//! When the control server stops answering, background polls back off so
//! the loop is not stuck in back-to-back blocking timeouts. Button presses
//! ignore the backoff; a person pressing the button always gets an attempt.

use std::time::{Duration, Instant};

/// Configuration for reconnection backoff.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Upper bound on the delay.
    pub max_delay: Duration,
    /// Multiplier applied after each further failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Backoff state machine driven by request outcomes.
#[derive(Debug)]
pub struct Backoff {
    config: BackoffConfig,
    current_delay: Duration,
    last_failure: Option<Instant>,
    consecutive_failures: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current_delay: config.initial_delay,
            config,
            last_failure: None,
            consecutive_failures: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(BackoffConfig::default())
    }

    /// `true` if nothing has failed yet or the delay since the last failure has passed.
    pub fn should_attempt(&self) -> bool {
        self.should_attempt_at(Instant::now())
    }

    pub fn should_attempt_at(&self, now: Instant) -> bool {
        match self.last_failure {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.current_delay,
        }
    }

    pub fn record_failure(&mut self) {
        self.record_failure_at(Instant::now());
    }

    pub fn record_failure_at(&mut self, now: Instant) {
        if self.last_failure.is_some() {
            let next = self.current_delay.as_secs_f64() * self.config.multiplier;
            self.current_delay = Duration::from_secs_f64(next).min(self.config.max_delay);
        }
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure = Some(now);
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay = self.config.initial_delay;
        self.last_failure = None;
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Delay that must pass after the last failure before the next poll.
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }
}
