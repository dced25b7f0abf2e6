//! Source-to-target identifier mapping.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One identifier change: the question at `position` moves from `source_id` to `target_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MappingEntry {
    pub position: usize,
    pub source_id: String,
    pub target_id: String,
}

/// Identifier changes ordered by source position.
///
/// Functional in `source_id`; injective in `target_id` once conflicts are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mapping {
    entries: Vec<MappingEntry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries; later entries for an already-mapped source id are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = MappingEntry>) -> Self {
        let mut mapping = Self::new();
        for entry in entries {
            mapping.insert(entry);
        }
        mapping
    }

    /// Insert keeping position order. Returns false if the source id is already mapped.
    pub fn insert(&mut self, entry: MappingEntry) -> bool {
        if self.entries.iter().any(|e| e.source_id == entry.source_id) {
            return false;
        }
        let idx = self
            .entries
            .partition_point(|e| e.position <= entry.position);
        self.entries.insert(idx, entry);
        true
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target id for a source id.
    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source_id == source_id)
            .map(|e| e.target_id.as_str())
    }

    pub fn entry_at(&self, position: usize) -> Option<&MappingEntry> {
        self.entries.iter().find(|e| e.position == position)
    }

    /// `(source_id, target_id)` pairs in position order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.source_id.as_str(), e.target_id.as_str()))
            .collect()
    }

    pub(crate) fn retarget(&mut self, position: usize, target_id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.position == position) {
            entry.target_id = target_id.to_string();
        }
    }

    pub(crate) fn remove(&mut self, position: usize) -> Option<MappingEntry> {
        let idx = self.entries.iter().position(|e| e.position == position)?;
        Some(self.entries.remove(idx))
    }

    /// Target ids claimed by more than one entry, with the claiming positions.
    ///
    /// Ordered by the first claiming position.
    pub fn duplicate_targets(&self) -> Vec<(&str, Vec<usize>)> {
        let mut claims: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut order = Vec::new();
        for entry in &self.entries {
            let positions = claims.entry(entry.target_id.as_str()).or_default();
            if positions.is_empty() {
                order.push(entry.target_id.as_str());
            }
            positions.push(entry.position);
        }
        order
            .into_iter()
            .filter_map(|id| {
                let positions = claims.remove(id)?;
                (positions.len() > 1).then(|| (id, positions))
            })
            .collect()
    }

    pub fn is_injective(&self) -> bool {
        self.duplicate_targets().is_empty()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}→{}", entry.source_id, entry.target_id)?;
        }
        write!(f, "}}")
    }
}
