//! Interactive tree view.

use anyhow::{Context, Result};
use lazytree_core::config::Config;
use tracing::info;

pub async fn run(config: &Config) -> Result<()> {
    let store = config.load_store().context("load hierarchy")?;
    let source = config
        .hierarchy_path()
        .map_or_else(|| "sample".to_string(), |path| path.display().to_string());
    info!(%source, records = store.len(), "opening tree view");
    lazytree_tui::run_tree_view(config, store, source).await
}
