//! Flattened view of the hierarchy.
//!
//! [`FlatTree`] owns the visible sequence: an ordered list of
//! [`VisibleNode`]s in which every expanded node is immediately followed by
//! its descendants (all at a deeper level). Expanding splices a node's
//! children in right after it; collapsing removes the contiguous run of
//! deeper nodes that follows it.
//!
//! ## Toggle lifecycle
//!
//! A toggle is split in three steps so that a runtime can own the timer:
//!
//! 1. [`FlatTree::begin_toggle`] marks the node as loading, registers a
//!    pending toggle and returns a [`ToggleTicket`].
//! 2. [`ToggleTicket::ready`] waits out the load latency.
//! 3. [`FlatTree::finish_toggle`] applies the splice if the ticket is still
//!    the live one for its node.
//!
//! [`FlatTree::toggle`] runs the three steps in sequence.
//!
//! ## Publishing
//!
//! Every change is sent on a `watch` channel. Receivers from
//! [`FlatTree::subscribe`] always observe the latest sequence, including
//! receivers created after the change.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::node::VisibleNode;
use crate::pending::{
    PendingToggle, ReentrantPolicy, ToggleAction, ToggleReady, ToggleSeq, ToggleTicket,
};
use crate::record::RecordId;
use crate::store::HierarchyStore;

/// Tunables for a [`FlatTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Simulated load latency applied to every toggle.
    pub latency: Duration,
    pub reentrant: ReentrantPolicy,
}

impl TreeOptions {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

    /// Options with no latency (toggles resolve on the next poll).
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
            reentrant: ReentrantPolicy::default(),
        }
    }
}

pub struct FlatTree {
    store: Arc<HierarchyStore>,
    options: TreeOptions,
    nodes: Vec<VisibleNode>,
    pending: HashMap<RecordId, PendingToggle>,
    seq: ToggleSeq,
    publisher: watch::Sender<Vec<VisibleNode>>,
}

impl FlatTree {
    /// Creates a view showing the store's roots.
    pub fn new(store: Arc<HierarchyStore>, options: TreeOptions) -> Self {
        let nodes = store.initial_roots();
        let (publisher, _) = watch::channel(nodes.clone());
        Self {
            store,
            options,
            nodes,
            pending: HashMap::new(),
            seq: ToggleSeq::default(),
            publisher,
        }
    }

    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    /// The current visible sequence.
    pub fn nodes(&self) -> &[VisibleNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Subscribes to sequence changes. The receiver starts at the latest value.
    pub fn subscribe(&self) -> watch::Receiver<Vec<VisibleNode>> {
        self.publisher.subscribe()
    }

    /// Index of the node showing `id`, if it is visible.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    pub fn node(&self, id: RecordId) -> Option<&VisibleNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Index of the nearest node above `index` with a lower level.
    pub fn parent_position(&self, index: usize) -> Option<usize> {
        let level = self.nodes.get(index)?.level;
        self.nodes[..index]
            .iter()
            .rposition(|node| node.level < level)
    }

    pub fn is_pending(&self, id: RecordId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Direction of the pending toggle on `id`, if any.
    pub fn pending_action(&self, id: RecordId) -> Option<ToggleAction> {
        self.pending.get(&id).map(|pending| pending.action)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Starts a toggle on the node showing `id`.
    ///
    /// Returns `None` (leaving the sequence untouched) when the record has no
    /// children entry, the node is not visible, or a pending toggle on the
    /// node is kept under [`ReentrantPolicy::Reject`]. Under
    /// [`ReentrantPolicy::Supersede`] a pending toggle is cancelled first; if
    /// the node already is in the requested state nothing new is scheduled.
    pub fn begin_toggle(&mut self, id: RecordId, action: ToggleAction) -> Option<ToggleTicket> {
        if self.store.children_of(id).is_none() {
            debug!(record = %id, %action, "toggle ignored: no children entry");
            return None;
        }
        let Some(index) = self.position(id) else {
            debug!(record = %id, %action, "toggle ignored: node not visible");
            return None;
        };

        if let Some(previous) = self.pending.get(&id) {
            match self.options.reentrant {
                ReentrantPolicy::Reject => {
                    debug!(record = %id, %action, pending = %previous.action, "toggle rejected: already pending");
                    return None;
                }
                ReentrantPolicy::Supersede => {
                    debug!(record = %id, %action, pending = %previous.action, "superseding pending toggle");
                    previous.cancel.cancel();
                    self.pending.remove(&id);
                }
            }
        }

        let node = &mut self.nodes[index];
        if node.is_expanded == action.is_expand() {
            if node.is_loading {
                node.is_loading = false;
                self.publish();
            }
            debug!(record = %id, %action, "toggle ignored: already in requested state");
            return None;
        }

        node.is_loading = true;
        let pending = PendingToggle {
            id: self.seq.next_id(),
            action,
            cancel: CancellationToken::new(),
        };
        let ticket = ToggleTicket::new(&pending, id, self.options.latency);
        self.pending.insert(id, pending);
        trace!(record = %id, %action, toggle = ticket.id.0, "toggle started");
        self.publish();
        Some(ticket)
    }

    /// Applies a toggle whose latency has elapsed.
    ///
    /// Returns `false` without touching the sequence if the ticket was
    /// superseded or cancelled, or if its node is no longer visible.
    pub fn finish_toggle(&mut self, ready: ToggleReady) -> bool {
        let pending = match self.pending.remove(&ready.record) {
            Some(pending) if pending.id == ready.id => pending,
            other => {
                // A newer toggle owns the node; leave it registered.
                if let Some(live) = other {
                    self.pending.insert(ready.record, live);
                }
                debug!(record = %ready.record, toggle = ready.id.0, "stale toggle ignored");
                return false;
            }
        };

        // The node may have been removed by an ancestor's collapse while the
        // timer was running; its position is resolved only now.
        let Some(index) = self.position(ready.record) else {
            debug!(record = %ready.record, "toggle dropped: node no longer visible");
            return false;
        };

        match pending.action {
            ToggleAction::Expand => self.splice_children(index),
            ToggleAction::Collapse => self.remove_descendants(index),
        }

        let node = &mut self.nodes[index];
        node.is_loading = false;
        node.is_expanded = pending.action.is_expand();
        debug!(record = %ready.record, action = %pending.action, visible = self.nodes.len(), "toggle applied");
        self.publish();
        true
    }

    /// Cancels the pending toggle on `id`, if any.
    pub fn cancel_toggle(&mut self, id: RecordId) -> bool {
        let Some(pending) = self.pending.remove(&id) else {
            return false;
        };
        pending.cancel.cancel();
        if let Some(index) = self.position(id) {
            self.nodes[index].is_loading = false;
        }
        debug!(record = %id, action = %pending.action, "toggle cancelled");
        self.publish();
        true
    }

    /// Expands or collapses `id`, waiting out the latency inline.
    ///
    /// Returns `true` if the sequence changed shape.
    pub async fn toggle(&mut self, id: RecordId, action: ToggleAction) -> bool {
        let Some(ticket) = self.begin_toggle(id, action) else {
            return false;
        };
        match ticket.ready().await {
            Some(ready) => self.finish_toggle(ready),
            None => false,
        }
    }

    fn splice_children(&mut self, index: usize) {
        let parent_level = self.nodes[index].level;
        let parent_id = self.nodes[index].id();
        let Some(children) = self.store.children_of(parent_id) else {
            return;
        };
        let block: Vec<VisibleNode> = children
            .iter()
            .map(|child| {
                VisibleNode::new(
                    child.clone(),
                    parent_level + 1,
                    self.store.is_expandable(child.id),
                )
            })
            .collect();
        self.nodes.splice(index + 1..index + 1, block);
    }

    fn remove_descendants(&mut self, index: usize) {
        let level = self.nodes[index].level;
        let count = self.nodes[index + 1..]
            .iter()
            .take_while(|node| node.level > level)
            .count();
        let removed: Vec<VisibleNode> = self.nodes.drain(index + 1..index + 1 + count).collect();

        for node in &removed {
            if let Some(pending) = self.pending.remove(&node.id()) {
                pending.cancel.cancel();
                debug!(record = %node.id(), "descendant toggle cancelled by collapse");
            }
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.nodes.clone());
    }
}

impl fmt::Debug for FlatTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatTree")
            .field("options", &self.options)
            .field("visible", &self.nodes.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
