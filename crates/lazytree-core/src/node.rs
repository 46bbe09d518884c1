//! Visible nodes: records annotated with display depth and expansion state.

use serde::Serialize;

use crate::record::{Record, RecordId};

/// A record as it currently appears in the flattened view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleNode {
    pub record: Record,
    /// Depth from a root (roots are level 0).
    pub level: usize,
    /// True iff the record has a children entry in the store.
    pub expandable: bool,
    /// Set while a toggle on this node is waiting out its load latency.
    pub is_loading: bool,
    /// True between a completed expand and the next completed collapse.
    pub is_expanded: bool,
}

impl VisibleNode {
    /// Creates a collapsed, idle node.
    pub fn new(record: Record, level: usize, expandable: bool) -> Self {
        Self {
            record,
            level,
            expandable,
            is_loading: false,
            is_expanded: false,
        }
    }

    pub fn id(&self) -> RecordId {
        self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }
}
