//! Button events delivered to the controller loop
//!
//! Edges arrive already debounced. The loop handles one press at a time;
//! presses that pile up while a request is in flight are dropped with
//! [`discard_pending`] instead of being replayed afterwards.

use std::io::BufRead;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    /// The button source has shut down
    Quit,
}

/// Drop every event already waiting in the channel
///
/// Returns how many presses were discarded. A pending `Quit` is not
/// discarded; it is returned so the loop can still stop.
pub fn discard_pending(events: &Receiver<ButtonEvent>) -> (usize, Option<ButtonEvent>) {
    let mut discarded = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            ButtonEvent::Press => discarded += 1,
            ButtonEvent::Quit => return (discarded, Some(ButtonEvent::Quit)),
        }
    }
    if discarded > 0 {
        debug!(discarded, "ignored presses received during request");
    }
    (discarded, None)
}

/// Treat each line of `reader` as a button press
///
/// A line reading `q` or `quit`, or end of input, sends `Quit` and ends the
/// thread. Used on hosts without a physical button, where Enter stands in
/// for a press.
pub fn spawn_line_button<R>(reader: R, events: Sender<ButtonEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            let event = match line.trim() {
                "q" | "quit" => ButtonEvent::Quit,
                _ => ButtonEvent::Press,
            };
            if events.send(event).is_err() || event == ButtonEvent::Quit {
                return;
            }
        }
        let _ = events.send(ButtonEvent::Quit);
    })
}
