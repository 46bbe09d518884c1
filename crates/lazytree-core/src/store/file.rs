//! Hierarchy files.
//!
//! A hierarchy file is a TOML document listing every record once and naming
//! children by id:
//!
//! ```toml
//! roots = [1, 5]
//!
//! [[records]]
//! id = 1
//! name = "Fruits"
//! type = "pdf"
//! children = [2, 3, 4]
//! ```
//!
//! A record with a `children` key (even an empty list) is expandable; one
//! without it is a leaf.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::HierarchyStore;
use crate::record::{Record, RecordId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyFile {
    pub roots: Vec<RecordId>,
    #[serde(default)]
    pub records: Vec<RecordEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RecordId>>,
}

impl HierarchyFile {
    /// Reads and parses a hierarchy file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read hierarchy from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse hierarchy from {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Describes an existing store in file form.
    pub fn from_store(store: &HierarchyStore) -> Self {
        let records = store
            .records
            .values()
            .map(|record| RecordEntry {
                id: record.id,
                name: record.name.clone(),
                kind: record.kind.clone(),
                children: store
                    .children_of(record.id)
                    .map(|kids| kids.iter().map(|kid| kid.id).collect()),
            })
            .collect();

        Self {
            roots: store.roots().iter().map(|root| root.id).collect(),
            records,
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize hierarchy")
    }

    /// Resolves ids and builds a validated store.
    pub fn into_store(self) -> Result<HierarchyStore> {
        let mut by_id: BTreeMap<RecordId, RecordEntry> = BTreeMap::new();
        for entry in self.records {
            let id = entry.id;
            if by_id.insert(id, entry).is_some() {
                bail!("Duplicate record {id}");
            }
        }

        let resolve = |id: RecordId, referrer: &str| -> Result<Record> {
            let entry = by_id
                .get(&id)
                .with_context(|| format!("Unknown record {id} referenced by {referrer}"))?;
            Ok(Record {
                id,
                name: entry.name.clone(),
                kind: entry.kind.clone(),
            })
        };

        let mut builder = HierarchyStore::builder();
        for root in &self.roots {
            builder = builder.root(resolve(*root, "roots")?);
        }
        for entry in by_id.values() {
            let Some(children) = &entry.children else {
                continue;
            };
            let referrer = format!("record {}", entry.id);
            let kids = children
                .iter()
                .map(|kid| resolve(*kid, &referrer))
                .collect::<Result<Vec<_>>>()?;
            builder = builder.children(entry.id, kids);
        }
        builder.build()
    }
}

impl HierarchyStore {
    /// Loads and validates a hierarchy file.
    pub fn load(path: &Path) -> Result<Self> {
        HierarchyFile::load(path)?
            .into_store()
            .with_context(|| format!("Invalid hierarchy in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
roots = [1]

[[records]]
id = 1
name = "src"
type = "dir"
children = [2, 3]

[[records]]
id = 2
name = "lib.rs"
type = "rs"

[[records]]
id = 3
name = "empty"
type = "dir"
children = []
"#;

    #[test]
    fn test_parse_small_hierarchy() {
        let store = HierarchyFile::parse(SMALL).unwrap().into_store().unwrap();

        assert_eq!(store.roots().len(), 1);
        assert_eq!(store.roots()[0].name, "src");
        let kids = store.children_of(RecordId(1)).unwrap();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].kind, "rs");
        assert!(!store.is_expandable(RecordId(2)));
        assert!(store.is_expandable(RecordId(3)));
    }

    #[test]
    fn test_unknown_child_is_an_error() {
        let contents = r#"
roots = [1]

[[records]]
id = 1
name = "src"
children = [42]
"#;
        let err = HierarchyFile::parse(contents)
            .unwrap()
            .into_store()
            .unwrap_err();
        assert!(format!("{err:#}").contains("Unknown record #42"));
    }

    #[test]
    fn test_duplicate_record_is_an_error() {
        let contents = r#"
roots = [1]

[[records]]
id = 1
name = "a"

[[records]]
id = 1
name = "b"
"#;
        let err = HierarchyFile::parse(contents)
            .unwrap()
            .into_store()
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate record #1"));
    }

    #[test]
    fn test_shared_child_is_an_error() {
        let contents = r#"
roots = [1, 5]

[[records]]
id = 1
name = "a"
children = [3]

[[records]]
id = 5
name = "b"
children = [3]

[[records]]
id = 3
name = "shared"
"#;
        let err = HierarchyFile::parse(contents)
            .unwrap()
            .into_store()
            .unwrap_err();
        assert!(err.to_string().contains("Record #3 appears more than once"));
    }

    #[test]
    fn test_sample_survives_file_form() {
        let sample = HierarchyStore::sample();
        let text = HierarchyFile::from_store(&sample).to_toml_string().unwrap();
        let reloaded = HierarchyFile::parse(&text).unwrap().into_store().unwrap();

        assert_eq!(reloaded.roots(), sample.roots());
        for (id, kids) in sample.entries() {
            assert_eq!(reloaded.children_of(id), Some(kids));
        }
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.toml");
        fs::write(&path, "roots = [").unwrap();

        let err = HierarchyStore::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("tree.toml"));
    }
}
