//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer only mutates state; timers and task spawning happen in the
//! runtime.

use lazytree_core::ToggleTicket;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Wait out a toggle's latency in the background, then report back
    /// through the inbox.
    ScheduleToggle { ticket: ToggleTicket },
}
