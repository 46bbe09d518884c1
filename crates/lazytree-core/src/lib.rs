//! Core of lazytree: a read-only hierarchy and the flattened, lazily
//! expanded view built on top of it.

pub mod config;
pub mod logging;
pub mod node;
pub mod pending;
pub mod record;
pub mod store;
pub mod tree;

pub use node::VisibleNode;
pub use pending::{ReentrantPolicy, ToggleAction, ToggleId, ToggleReady, ToggleTicket};
pub use record::{Record, RecordId};
pub use store::HierarchyStore;
pub use tree::{FlatTree, TreeOptions};
