//! The controller main loop
//!
//! One thread owns the controller. Button events arrive over a channel;
//! between events the loop wakes up on a short tick to poll the server and
//! to notice shutdown requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use sonos_remote::button::discard_pending;
use sonos_remote::{ButtonEvent, RemoteToggleController, StatusIndicator, Transport};
use tracing::{debug, info};

/// Upper bound on how long the loop sleeps between checks
const MAX_TICK: Duration = Duration::from_millis(250);

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    Shutdown,
    SourceClosed,
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub presses: u64,
    pub ignored: u64,
    pub stop: StopReason,
}

pub fn run_loop<T, L>(
    controller: &mut RemoteToggleController<T, L>,
    events: &Receiver<ButtonEvent>,
    shutdown: &AtomicBool,
    tick: Duration,
) -> RunSummary
where
    T: Transport,
    L: StatusIndicator,
{
    let tick = tick.min(MAX_TICK);
    let mut presses = 0;
    let mut ignored = 0;

    // Light the LED with the current state before the first press
    controller.poll();
    let mut quit = drain_queued(events, &mut ignored);

    let stop = loop {
        if quit {
            break StopReason::Quit;
        }
        if shutdown.load(Ordering::SeqCst) {
            break StopReason::Shutdown;
        }

        match events.recv_timeout(tick) {
            Ok(ButtonEvent::Press) => {
                presses += 1;
                let led = controller.on_button_press();
                let status = controller
                    .last_status()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                info!(state = %controller.state(), status = %status, led = %led, "press handled");
                quit = drain_queued(events, &mut ignored);
            }
            Ok(ButtonEvent::Quit) => break StopReason::Quit,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(status) = controller.poll() {
                    debug!(state = %controller.state(), status = %status, "polled");
                    quit = drain_queued(events, &mut ignored);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break StopReason::SourceClosed,
        }
    };

    RunSummary {
        presses,
        ignored,
        stop,
    }
}

/// Drop presses that arrived while a request was blocking
///
/// Returns `true` when a Quit was queued among them.
fn drain_queued(events: &Receiver<ButtonEvent>, ignored: &mut u64) -> bool {
    let (discarded, pending) = discard_pending(events);
    *ignored += discarded as u64;
    pending == Some(ButtonEvent::Quit)
}
