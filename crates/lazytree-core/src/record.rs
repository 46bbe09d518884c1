//! Domain records shown as tree entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// An immutable tree entry.
///
/// Two records with the same `id` denote the same entry, even when they were
/// constructed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    /// Free-form type tag (e.g. a file extension).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Record {
    pub fn new(id: u32, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: RecordId(id),
            name: name.into(),
            kind: kind.into(),
        }
    }
}
