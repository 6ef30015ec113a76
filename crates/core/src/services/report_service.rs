use tracing::warn;

use crate::errors::CoreError;
use crate::models::report::ReportSet;
use crate::storage::kv::KeyValueStore;

/// Storage key under which the pinned ids are persisted.
pub const REPORTS_KEY: &str = "reports";

/// Owns the pinned-coin set and its persistence.
///
/// Invariants maintained here:
/// - `len ≤ max_reports` at all times
/// - no duplicate ids, insertion order preserved
/// - every successful mutation is followed by one synchronous write of the
///   full set, as a JSON array of id strings under `"reports"`
pub struct ReportStore {
    store: Box<dyn KeyValueStore>,
    reports: ReportSet,
    max_reports: usize,
}

impl ReportStore {
    /// Load the persisted set from `store`.
    ///
    /// A missing key or malformed value degrades to an empty set — never
    /// an error. A persisted value that violates the invariants (dupes,
    /// over capacity) is repaired on the way in.
    pub fn load(store: Box<dyn KeyValueStore>, max_reports: usize) -> Self {
        let reports = match store.get(REPORTS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => {
                    let mut set = ReportSet::from_ids(ids);
                    set.truncate(max_reports);
                    set
                }
                Err(e) => {
                    warn!(error = %e, "persisted reports malformed, starting empty");
                    ReportSet::new()
                }
            },
            None => ReportSet::new(),
        };

        Self {
            store,
            reports,
            max_reports,
        }
    }

    /// Pin a coin.
    ///
    /// - already pinned: no-op, no write, returns the unchanged set
    /// - set full: `ReportLimitReached`, nothing mutated or written — the
    ///   caller must revert any optimistic toggle state
    /// - otherwise: appended at the end and persisted synchronously
    pub fn pin(&mut self, id: &str) -> Result<&ReportSet, CoreError> {
        if self.reports.contains(id) {
            return Ok(&self.reports);
        }
        if self.reports.len() >= self.max_reports {
            return Err(CoreError::ReportLimitReached {
                max: self.max_reports,
            });
        }

        self.reports.insert(id.to_string());
        self.persist()?;
        Ok(&self.reports)
    }

    /// Unpin a coin. Removing an absent id leaves the set contents
    /// unchanged; the persistence write still happens either way,
    /// preserving the long-standing behavior of the original frontend.
    pub fn unpin(&mut self, id: &str) -> Result<&ReportSet, CoreError> {
        self.reports.remove(id);
        self.persist()?;
        Ok(&self.reports)
    }

    /// Read-only snapshot of the current set.
    #[must_use]
    pub fn current(&self) -> &ReportSet {
        &self.reports
    }

    #[must_use]
    pub fn max_reports(&self) -> usize {
        self.max_reports
    }

    /// Write the full set as a JSON array of id strings. All-or-nothing.
    fn persist(&mut self) -> Result<(), CoreError> {
        let json = serde_json::to_string(self.reports.ids())
            .map_err(|e| CoreError::Storage(format!("Failed to serialize reports: {e}")))?;
        self.store.set(REPORTS_KEY, &json)
    }
}
