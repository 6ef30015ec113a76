use std::collections::HashMap;

use crate::errors::CoreError;

/// Durable key-value storage, the shape of a browser's localStorage:
/// string keys, string values, synchronous whole-value writes.
///
/// The report store persists through this trait so the same core runs
/// against a file on disk, an embedder-provided bridge, or an in-memory
/// map in tests.
pub trait KeyValueStore: Send {
    /// Read the value under `key`. `None` when the key was never written.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    /// All-or-nothing per call; no partial writes.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Volatile in-memory store. Useful for tests and for embedders that
/// handle durability themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, for simulating a previous session's state.
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
