// ═══════════════════════════════════════════════════════════════════
// Report Store Tests — capacity, persistence, degradation
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use coin_report_core::errors::CoreError;
use coin_report_core::services::report_service::{ReportStore, REPORTS_KEY};
use coin_report_core::storage::kv::{KeyValueStore, MemoryStore};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — a store the test can still inspect after handing it over
// ═══════════════════════════════════════════════════════════════════

/// Key-value store backed by shared state, so a test can look at what was
/// persisted (and count writes) after the `ReportStore` took ownership.
#[derive(Clone, Default)]
struct SharedStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl SharedStore {
    fn new() -> Self {
        Self::default()
    }

    fn seeded(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    fn persisted(&self) -> Option<String> {
        self.entries.lock().unwrap().get(REPORTS_KEY).cloned()
    }

    fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn store_with(ids: &[&str]) -> ReportStore {
    let json = serde_json::to_string(ids).unwrap();
    let backing = SharedStore::seeded(REPORTS_KEY, &json);
    ReportStore::load(Box::new(backing), 5)
}

// ═══════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════

mod loading {
    use super::*;

    #[test]
    fn missing_key_loads_empty() {
        let store = ReportStore::load(Box::new(MemoryStore::new()), 5);
        assert!(store.current().is_empty());
    }

    #[test]
    fn persisted_ids_load_in_order() {
        let store = store_with(&["bitcoin", "ethereum"]);
        assert_eq!(store.current().ids(), ["bitcoin", "ethereum"]);
    }

    #[test]
    fn malformed_json_loads_empty() {
        let backing = SharedStore::seeded(REPORTS_KEY, "{not json");
        let store = ReportStore::load(Box::new(backing), 5);
        assert!(store.current().is_empty());
    }

    #[test]
    fn wrong_json_shape_loads_empty() {
        let backing = SharedStore::seeded(REPORTS_KEY, r#"{"reports": ["bitcoin"]}"#);
        let store = ReportStore::load(Box::new(backing), 5);
        assert!(store.current().is_empty());
    }

    #[test]
    fn oversized_persisted_set_is_clamped() {
        let store = store_with(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(store.current().len(), 5);
        assert_eq!(store.current().ids(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn duplicated_persisted_ids_are_deduped() {
        let store = store_with(&["bitcoin", "bitcoin", "ethereum"]);
        assert_eq!(store.current().ids(), ["bitcoin", "ethereum"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Pinning
// ═══════════════════════════════════════════════════════════════════

mod pinning {
    use super::*;

    #[test]
    fn pin_appends_in_insertion_order() {
        let mut store = ReportStore::load(Box::new(MemoryStore::new()), 5);
        store.pin("bitcoin").unwrap();
        store.pin("ethereum").unwrap();
        assert_eq!(store.current().ids(), ["bitcoin", "ethereum"]);
    }

    #[test]
    fn pin_persists_json_array() {
        let backing = SharedStore::new();
        let mut store = ReportStore::load(Box::new(backing.clone()), 5);

        store.pin("bitcoin").unwrap();
        assert_eq!(backing.persisted().as_deref(), Some(r#"["bitcoin"]"#));

        store.pin("ethereum").unwrap();
        assert_eq!(
            backing.persisted().as_deref(),
            Some(r#"["bitcoin","ethereum"]"#)
        );
    }

    #[test]
    fn pin_duplicate_is_noop_without_write() {
        let backing = SharedStore::new();
        let mut store = ReportStore::load(Box::new(backing.clone()), 5);

        store.pin("bitcoin").unwrap();
        let writes_before = backing.write_count();

        store.pin("bitcoin").unwrap();
        assert_eq!(store.current().len(), 1);
        assert_eq!(backing.write_count(), writes_before);
    }

    #[test]
    fn sixth_pin_fails_and_leaves_set_unchanged() {
        let backing = SharedStore::new();
        let mut store = ReportStore::load(Box::new(backing.clone()), 5);
        for id in ["bitcoin", "ethereum", "solana", "cardano", "polkadot"] {
            store.pin(id).unwrap();
        }
        let writes_before = backing.write_count();

        let result = store.pin("dogecoin");
        match result {
            Err(CoreError::ReportLimitReached { max }) => assert_eq!(max, 5),
            other => panic!("expected ReportLimitReached, got {other:?}"),
        }
        assert_eq!(
            store.current().ids(),
            ["bitcoin", "ethereum", "solana", "cardano", "polkadot"]
        );
        // Nothing was written for the rejected pin.
        assert_eq!(backing.write_count(), writes_before);
    }

    #[test]
    fn capacity_and_uniqueness_hold_across_sequences() {
        let mut store = ReportStore::load(Box::new(MemoryStore::new()), 5);
        let ops: &[(&str, bool)] = &[
            ("bitcoin", true),
            ("ethereum", true),
            ("bitcoin", true), // duplicate
            ("ethereum", false),
            ("solana", true),
            ("cardano", true),
            ("polkadot", true),
            ("dogecoin", true),
            ("tron", true), // would be 6th
            ("bitcoin", false),
            ("ripple", true),
        ];

        for &(id, pin) in ops {
            if pin {
                let _ = store.pin(id);
            } else {
                store.unpin(id).unwrap();
            }
            let set = store.current();
            assert!(set.len() <= 5, "capacity exceeded after {id}");
            let mut seen = std::collections::HashSet::new();
            assert!(
                set.iter().all(|i| seen.insert(i.to_string())),
                "duplicate id after {id}"
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Unpinning
// ═══════════════════════════════════════════════════════════════════

mod unpinning {
    use super::*;

    #[test]
    fn unpin_removes_and_persists() {
        let backing = SharedStore::new();
        let mut store = ReportStore::load(Box::new(backing.clone()), 5);
        store.pin("bitcoin").unwrap();
        store.pin("ethereum").unwrap();

        store.unpin("bitcoin").unwrap();
        assert_eq!(store.current().ids(), ["ethereum"]);
        assert_eq!(backing.persisted().as_deref(), Some(r#"["ethereum"]"#));
    }

    #[test]
    fn unpin_absent_keeps_contents() {
        let mut store = store_with(&["bitcoin"]);
        store.unpin("ethereum").unwrap();
        assert_eq!(store.current().ids(), ["bitcoin"]);
    }

    #[test]
    fn unpin_absent_still_writes() {
        // Long-standing behavior: the write happens even when nothing
        // was removed.
        let backing = SharedStore::new();
        let mut store = ReportStore::load(Box::new(backing.clone()), 5);
        store.pin("bitcoin").unwrap();
        let writes_before = backing.write_count();

        store.unpin("ethereum").unwrap();
        assert_eq!(backing.write_count(), writes_before + 1);
    }

    #[test]
    fn unpin_frees_capacity() {
        let mut store = ReportStore::load(Box::new(MemoryStore::new()), 5);
        for id in ["a", "b", "c", "d", "e"] {
            store.pin(id).unwrap();
        }
        assert!(store.pin("f").is_err());

        store.unpin("a").unwrap();
        store.pin("f").unwrap();
        assert_eq!(store.current().ids(), ["b", "c", "d", "e", "f"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Round trips across restarts
// ═══════════════════════════════════════════════════════════════════

mod restarts {
    use super::*;

    #[test]
    fn pins_survive_a_reload() {
        let backing = SharedStore::new();
        {
            let mut store = ReportStore::load(Box::new(backing.clone()), 5);
            store.pin("bitcoin").unwrap();
            store.pin("ethereum").unwrap();
            store.pin("solana").unwrap();
            store.unpin("ethereum").unwrap();
        }

        let reloaded = ReportStore::load(Box::new(backing), 5);
        assert_eq!(reloaded.current().ids(), ["bitcoin", "solana"]);
    }

    #[test]
    fn empty_set_round_trips() {
        let backing = SharedStore::new();
        {
            let mut store = ReportStore::load(Box::new(backing.clone()), 5);
            store.pin("bitcoin").unwrap();
            store.unpin("bitcoin").unwrap();
        }

        let reloaded = ReportStore::load(Box::new(backing), 5);
        assert!(reloaded.current().is_empty());
    }
}
