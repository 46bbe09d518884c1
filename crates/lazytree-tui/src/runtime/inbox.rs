//! Inbox channel types.
//!
//! Spawned effect handlers report back to the runtime through one unbounded
//! channel; the runtime drains it once per loop iteration.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
