//! Sample command handler.

use anyhow::Result;
use lazytree_core::HierarchyStore;
use lazytree_core::store::file::HierarchyFile;

/// Prints the built-in hierarchy in hierarchy-file form, ready to edit and
/// pass back with `--data`.
pub fn run() -> Result<()> {
    let file = HierarchyFile::from_store(&HierarchyStore::sample());
    print!("{}", file.to_toml_string()?);
    Ok(())
}
