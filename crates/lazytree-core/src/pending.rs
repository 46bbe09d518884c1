//! Pending toggle bookkeeping.
//!
//! Every expand/collapse waits out a simulated load latency before it is
//! applied. While it waits, the node owns exactly one live [`PendingToggle`];
//! the ticket handed to the caller carries the same id and cancellation token,
//! so a superseded or cancelled ticket can be recognized when it completes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::record::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleId(pub u64);

#[derive(Debug, Default)]
pub struct ToggleSeq {
    next: u64,
}

impl ToggleSeq {
    pub fn next_id(&mut self) -> ToggleId {
        let id = ToggleId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Direction of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleAction {
    Expand,
    Collapse,
}

impl ToggleAction {
    pub fn is_expand(self) -> bool {
        self == ToggleAction::Expand
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            ToggleAction::Expand => ToggleAction::Collapse,
            ToggleAction::Collapse => ToggleAction::Expand,
        }
    }
}

impl From<bool> for ToggleAction {
    fn from(expand: bool) -> Self {
        if expand {
            ToggleAction::Expand
        } else {
            ToggleAction::Collapse
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleAction::Expand => f.write_str("expand"),
            ToggleAction::Collapse => f.write_str("collapse"),
        }
    }
}

/// What to do with a toggle request on a node that already has one pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReentrantPolicy {
    /// Cancel the pending toggle and schedule the new one.
    #[default]
    Supersede,
    /// Keep the pending toggle and ignore the new request.
    Reject,
}

/// The live toggle registered for a node.
#[derive(Debug, Clone)]
pub struct PendingToggle {
    pub id: ToggleId,
    pub action: ToggleAction,
    pub cancel: CancellationToken,
}

/// Handed out when a toggle starts; resolves once the latency has elapsed.
#[derive(Debug)]
pub struct ToggleTicket {
    pub id: ToggleId,
    pub record: RecordId,
    pub action: ToggleAction,
    latency: Duration,
    cancel: CancellationToken,
}

impl ToggleTicket {
    pub(crate) fn new(pending: &PendingToggle, record: RecordId, latency: Duration) -> Self {
        Self {
            id: pending.id,
            record,
            action: pending.action,
            latency,
            cancel: pending.cancel.clone(),
        }
    }

    /// Token that cancels this ticket.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Waits out the load latency.
    ///
    /// Returns `None` if the ticket is cancelled (or superseded) first.
    pub async fn ready(self) -> Option<ToggleReady> {
        let ready = ToggleReady {
            id: self.id,
            record: self.record,
        };
        if self.latency.is_zero() {
            return (!self.cancel.is_cancelled()).then_some(ready);
        }
        tokio::select! {
            () = self.cancel.cancelled() => None,
            () = sleep(self.latency) => Some(ready),
        }
    }
}

/// A ticket whose latency has elapsed, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleReady {
    pub id: ToggleId,
    pub record: RecordId,
}
