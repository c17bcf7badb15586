use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::storage::{KeyValueStore, StorageError};
use crate::task::Task;

pub const DEFAULT_STORAGE_KEY: &str = "todo.tasks.v1";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed reading stored tasks")]
    Read(#[source] StorageError),

    #[error("stored tasks are not a valid task array")]
    Corrupt(#[source] serde_json::Error),
}

/// Result of decoding a stored value: the tasks plus how many duplicate ids
/// were dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub tasks: Vec<Task>,
    pub dropped_duplicates: usize,
}

pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Parses a stored task array. Every element must carry a string `id` and
/// a string `text`; anything else fails the whole value. Later records
/// reusing an id are dropped.
pub fn decode_tasks(raw: &str) -> Result<Decoded, serde_json::Error> {
    let parsed: Vec<Task> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(parsed.len());
    let before = parsed.len();
    let tasks: Vec<Task> = parsed
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();

    Ok(Decoded {
        dropped_duplicates: before - tasks.len(),
        tasks,
    })
}

/// The one component allowed to touch the backing key-value store. Every
/// save is a full-list replace under a single key.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn try_load(&self) -> Result<Vec<Task>, LoadError> {
        let Some(raw) = self.store.get(&self.key).map_err(LoadError::Read)? else {
            debug!("no stored tasks; starting empty");
            return Ok(Vec::new());
        };

        let decoded = decode_tasks(&raw).map_err(LoadError::Corrupt)?;
        if decoded.dropped_duplicates > 0 {
            warn!(
                dropped = decoded.dropped_duplicates,
                "stored tasks reused ids; kept first occurrence"
            );
        }

        debug!(count = decoded.tasks.len(), "loaded tasks");
        Ok(decoded.tasks)
    }

    /// Never fails: unreadable or corrupt data degrades to an empty list.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(key = %self.key, error = %error_chain(&err), "could not load saved tasks; starting empty");
                Vec::new()
            }
        }
    }

    /// Writes the whole list. A rejected write is logged and reported as
    /// `false`; the caller's in-memory list stays authoritative.
    #[tracing::instrument(skip(self, tasks), fields(key = %self.key, count = tasks.len()))]
    pub fn save(&mut self, tasks: &[Task]) -> bool {
        let encoded = match encode_tasks(tasks) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(error = %err, "failed encoding tasks");
                return false;
            }
        };

        match self.store.set(&self.key, &encoded) {
            Ok(()) => {
                debug!(bytes = encoded.len(), "saved tasks");
                true
            }
            Err(err) => {
                error!(error = %err, "failed saving tasks; keeping in-memory state");
                false
            }
        }
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
