use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded: value needs {needed} bytes, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage rejected the write: {0}")]
    Rejected(String),

    #[error("invalid storage key {0:?}: use letters, digits, '.', '_' or '-', not starting with '.'")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Synchronous string key-value store. The persistence layer is the only
/// caller; nothing else reads or writes the backing store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the whole value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys double as file names on disk, so they are restricted to ASCII
/// letters, digits, `.`, `_` and `-`, with no leading dot.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any single value longer than `bytes`, the way a browser
    /// refuses writes past its storage quota.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Writes straight into the map, bypassing the quota. Handy for seeding
    /// corrupt values in tests.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                needed: value.len(),
                limit,
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use anyhow::Context;
    use tempfile::NamedTempFile;
    use tracing::{debug, info};

    use super::{KeyValueStore, StorageError, validate_key};

    /// One file per key under a data directory. Writes land in a temp file
    /// next to the target and are renamed over it, so readers only ever see
    /// a complete old or new value.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        pub data_dir: PathBuf,
    }

    impl FileStore {
        #[tracing::instrument(skip(data_dir))]
        pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
            let data_dir = data_dir.to_path_buf();
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("failed to create {}", data_dir.display()))?;

            info!(data_dir = %data_dir.display(), "opened file store");
            Ok(Self { data_dir })
        }

        pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
            validate_key(key)?;
            Ok(self.data_dir.join(format!("{key}.json")))
        }
    }

    impl KeyValueStore for FileStore {
        #[tracing::instrument(skip(self))]
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let path = self.path_for(key)?;
            match fs::read_to_string(&path) {
                Ok(raw) => {
                    debug!(file = %path.display(), bytes = raw.len(), "read value");
                    Ok(Some(raw))
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            debug!(file = %path.display(), "writing value atomically");

            let mut temp = NamedTempFile::new_in(&self.data_dir)?;
            temp.write_all(value.as_bytes())?;
            temp.flush()?;
            temp.persist(&path).map_err(|err| StorageError::Io(err.error))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_replaces_values() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").expect("get").is_none());

        store.set("k", "one").expect("set");
        store.set("k", "two").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("two"));
    }

    #[test]
    fn memory_store_quota_rejects_large_values_and_keeps_old_one() {
        let mut store = MemoryStore::with_quota(4);
        store.set("k", "abcd").expect("fits");

        let err = store.set("k", "abcde").expect_err("over quota");
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 5,
                limit: 4
            }
        ));
        assert_eq!(store.raw("k"), Some("abcd"));
    }

    #[test]
    fn file_store_round_trips_and_survives_reopen() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(temp.path()).expect("open");
        assert!(store.get("todo.tasks.v1").expect("get").is_none());

        store.set("todo.tasks.v1", "[]").expect("set");
        store.set("todo.tasks.v1", "[1]").expect("overwrite");

        let reopened = FileStore::open(temp.path()).expect("reopen");
        assert_eq!(
            reopened.get("todo.tasks.v1").expect("get").as_deref(),
            Some("[1]")
        );

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(leftovers, vec!["todo.tasks.v1.json".to_string()]);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(temp.path()).expect("open");

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn key_rule() {
        for key in ["todo.tasks.v1", "work-list", "a_b.2"] {
            assert!(validate_key(key).is_ok(), "{key} should be accepted");
        }
        for key in ["", " ", "a/b", "a\\b", ".hidden", "tasks v1"] {
            assert!(validate_key(key).is_err(), "{key:?} should be rejected");
        }
    }
}
