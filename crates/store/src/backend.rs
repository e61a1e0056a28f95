//! Key-value persistence abstraction.
//!
//! The store never talks to disk (or any other medium) directly; it reads and
//! writes opaque blobs through this trait. That keeps the store testable with
//! a plain in-memory map and leaves the choice of medium to the embedder.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

/// Backend-level failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO failure reading or writing a key's blob.
    #[error("storage io failure for key '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal lock poisoning (a writer panicked mid-operation).
    #[error("storage lock poisoned")]
    Poisoned,

    /// A collection could not be serialized for persistence.
    #[error("failed to serialize blob for key '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal key-value contract the store persists through.
///
/// Object-safe on purpose: the store holds `Arc<dyn StorageBackend>`.
pub trait StorageBackend: Send + Sync {
    /// Fetch the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the blob stored under `key` in one step.
    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// In-memory backend for tests and dev.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}
