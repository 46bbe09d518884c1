//! Print command handler.
//!
//! Drives the same `FlatTree` as the interactive view, waiting out each
//! toggle's latency inline, then writes the visible sequence.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use lazytree_core::config::Config;
use lazytree_core::{FlatTree, RecordId, ToggleAction, VisibleNode};
use tracing::debug;

const MARKER_EXPANDED: char = '▾';
const MARKER_COLLAPSED: char = '▸';
const MARKER_LEAF: char = '•';

/// Expands `expand` in order and prints the result.
///
/// Ids that are not visible (or have no children) when their turn comes
/// leave the sequence unchanged.
pub async fn run(config: &Config, expand: &[u32], json: bool) -> Result<()> {
    let store = config.load_store().context("load hierarchy")?;
    let mut tree = FlatTree::new(Arc::new(store), config.tree_options());

    for &id in expand {
        let id = RecordId(id);
        if !tree.toggle(id, ToggleAction::Expand).await {
            debug!(record = %id, "expand left the sequence unchanged");
        }
    }

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, tree.nodes()).context("write json")?;
        writeln!(out)?;
    } else {
        for node in tree.nodes() {
            writeln!(out, "{}", format_node(node, config.indent_width))?;
        }
    }
    Ok(())
}

/// One text line per node: indentation, marker, name, type.
fn format_node(node: &VisibleNode, indent_width: u16) -> String {
    let marker = if node.is_expanded {
        MARKER_EXPANDED
    } else if node.expandable {
        MARKER_COLLAPSED
    } else {
        MARKER_LEAF
    };
    format!(
        "{:indent$}{marker} {} ({})",
        "",
        node.name(),
        node.record.kind,
        indent = node.level * usize::from(indent_width)
    )
}
