use std::collections::HashMap;
use std::path::PathBuf;

use tracing::warn;

use super::kv::KeyValueStore;
use crate::errors::CoreError;

/// File-backed key-value store: one JSON object on disk, rewritten in full
/// on every `set`.
///
/// Opening never fails: a missing file means a first run, and a corrupt
/// file is treated as "no prior state" — the same degradation the report
/// store applies to its own value. Write failures do surface, since losing
/// a pin silently would be worse than telling the caller.
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file is
    /// present and readable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "store file corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, entries }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<(), CoreError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CoreError::Storage(format!("Failed to serialize store: {e}")))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
