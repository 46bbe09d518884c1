//! Read-only hierarchy: parent record id → ordered child records, plus the
//! ordered root records.
//!
//! Lookups go through a `BTreeMap` keyed by [`RecordId`], so identity is the
//! id, never the position or address of a record value.

pub mod file;

use std::collections::{BTreeMap, HashSet};

use anyhow::{Result, bail};

use crate::node::VisibleNode;
use crate::record::{Record, RecordId};

#[derive(Debug, Clone, Default)]
pub struct HierarchyStore {
    roots: Vec<Record>,
    children: BTreeMap<RecordId, Vec<Record>>,
    records: BTreeMap<RecordId, Record>,
}

impl HierarchyStore {
    pub fn builder() -> HierarchyStoreBuilder {
        HierarchyStoreBuilder::default()
    }

    /// The compiled-in sample hierarchy.
    pub fn sample() -> Self {
        let fruits = Record::new(1, "Fruits", "pdf");
        let apple = Record::new(2, "Apple", "doc");
        let vegetables = Record::new(5, "Vegetables", "png");
        let onion = Record::new(8, "Onion", "png");

        let mut children = BTreeMap::new();
        children.insert(
            fruits.id,
            vec![
                apple.clone(),
                Record::new(3, "Orange", "pdf"),
                Record::new(4, "Banana", "pdf"),
            ],
        );
        children.insert(
            vegetables.id,
            vec![
                Record::new(6, "Tomato", "png"),
                Record::new(7, "Potato", "jpg"),
                onion.clone(),
            ],
        );
        children.insert(
            apple.id,
            vec![
                Record::new(10, "Fuji", "doc"),
                Record::new(11, "Macintosh", "doc"),
            ],
        );
        children.insert(
            onion.id,
            vec![
                Record::new(13, "Fuji", "doc"),
                Record::new(14, "White", "png"),
                Record::new(15, "Purple", "png"),
            ],
        );

        Self::assemble(vec![fruits, vegetables], children)
    }

    fn assemble(roots: Vec<Record>, children: BTreeMap<RecordId, Vec<Record>>) -> Self {
        let mut records = BTreeMap::new();
        for record in roots.iter().chain(children.values().flatten()) {
            records
                .entry(record.id)
                .or_insert_with(|| record.clone());
        }
        Self {
            roots,
            children,
            records,
        }
    }

    /// One collapsed level-0 node per root, in root order.
    pub fn initial_roots(&self) -> Vec<VisibleNode> {
        self.roots
            .iter()
            .map(|root| VisibleNode::new(root.clone(), 0, self.is_expandable(root.id)))
            .collect()
    }

    /// Children of `id`, or `None` if it has no children entry.
    pub fn children_of(&self, id: RecordId) -> Option<&[Record]> {
        self.children.get(&id).map(Vec::as_slice)
    }

    pub fn is_expandable(&self, id: RecordId) -> bool {
        self.children.contains_key(&id)
    }

    pub fn roots(&self) -> &[Record] {
        &self.roots
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Iterates over the children entries in id order.
    pub fn entries(&self) -> impl Iterator<Item = (RecordId, &[Record])> {
        self.children.iter().map(|(id, kids)| (*id, kids.as_slice()))
    }

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collects roots and children entries, then validates them in [`build`].
///
/// [`build`]: HierarchyStoreBuilder::build
#[derive(Debug, Default)]
pub struct HierarchyStoreBuilder {
    roots: Vec<Record>,
    entries: Vec<(RecordId, Vec<Record>)>,
}

impl HierarchyStoreBuilder {
    #[must_use]
    pub fn root(mut self, record: Record) -> Self {
        self.roots.push(record);
        self
    }

    #[must_use]
    pub fn children(mut self, parent: RecordId, children: Vec<Record>) -> Self {
        self.entries.push((parent, children));
        self
    }

    /// Validates and freezes the hierarchy.
    ///
    /// Every record may appear at most once across the roots and all
    /// children lists, and every children entry must be reachable by walking
    /// down from the roots. Together these rule out shared subtrees and
    /// cycles, so a record id names exactly one row of the flattened view.
    ///
    /// # Errors
    /// Fails on a record listed more than once, duplicate children entries
    /// for one parent, or a children entry not reachable from any root.
    pub fn build(self) -> Result<HierarchyStore> {
        let mut children = BTreeMap::new();
        for (parent, kids) in self.entries {
            if children.insert(parent, kids).is_some() {
                bail!("Duplicate children entry for {parent}");
            }
        }

        let mut listed = HashSet::new();
        for record in self.roots.iter().chain(children.values().flatten()) {
            if !listed.insert(record.id) {
                bail!("Record {} appears more than once in the hierarchy", record.id);
            }
        }

        let mut reached = HashSet::new();
        let mut stack: Vec<RecordId> = self.roots.iter().map(|root| root.id).collect();
        while let Some(id) = stack.pop() {
            if let Some(kids) = children.get(&id)
                && reached.insert(id)
            {
                stack.extend(kids.iter().map(|kid| kid.id));
            }
        }
        if let Some(orphan) = children.keys().find(|id| !reached.contains(id)) {
            bail!("Children entry for {orphan} is not reachable from any root");
        }

        Ok(HierarchyStore::assemble(self.roots, children))
    }
}
