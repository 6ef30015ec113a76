use serde::{Deserialize, Serialize};

/// The ordered set of pinned coin ids.
///
/// Duplicate-free, insertion order preserved. Order is deliberately NOT
/// sorted: chart legend and series order must stay stable across renders,
/// matching the order in which the user pinned the coins.
///
/// Capacity is enforced by the owning `ReportStore`, not here — this type
/// only guarantees uniqueness and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportSet {
    ids: Vec<String>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw ids, dropping duplicates while keeping the
    /// first occurrence's position. Used when loading persisted state.
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Append `id` at the end. Returns `false` (and leaves the set
    /// untouched) if the id is already present.
    pub fn insert(&mut self, id: String) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id` if present. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Drop everything past the first `max` entries. Used to repair
    /// persisted state that exceeds the capacity bound.
    pub(crate) fn truncate(&mut self, max: usize) {
        self.ids.truncate(max);
    }
}
