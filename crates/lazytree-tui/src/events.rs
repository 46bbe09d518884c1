//! UI events consumed by the reducer.

use crossterm::event::Event;
use lazytree_core::{RecordId, ToggleReady};

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; drives the spinner and triggers a render.
    Tick,
    /// Current terminal size, sent before every batch of events.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// A toggle's load latency elapsed.
    ToggleReady(ToggleReady),
    /// A toggle's ticket was cancelled before its latency elapsed.
    ToggleCancelled { record: RecordId },
}
