//! Full-screen terminal view for lazytree.

pub mod common;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};
use std::sync::Arc;

use anyhow::Result;
use lazytree_core::config::Config;
use lazytree_core::{FlatTree, HierarchyStore};
use tokio::task;
pub use runtime::TuiRuntime;
pub use state::AppState;

/// Runs the interactive tree view until the user quits.
///
/// `source` names where the hierarchy came from and is shown in the header.
pub async fn run_tree_view(config: &Config, store: HierarchyStore, source: String) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The tree view requires a terminal.\n\
             Use `lazytree print` for non-interactive output."
        );
    }

    let tree = FlatTree::new(Arc::new(store), config.tree_options());
    let state = AppState::new(tree, config.indent_width, source);
    let mut runtime = TuiRuntime::new(state)?;

    // The event loop blocks on terminal polling; move other tasks (the
    // toggle timers) off this worker while it runs.
    task::block_in_place(|| runtime.run())
}
