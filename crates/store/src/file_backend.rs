//! File-system storage backend: one file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::backend::{StorageBackend, StorageError};

/// Stores each key as a `.json` file under a root directory.
///
/// Keys are sanitized to file-name-safe characters; the fixed keys the store
/// uses pass through unchanged.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create the backend, creating `root` if it does not exist yet.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.to_string_lossy().into_owned(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(self.path_for(key), bytes).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }
}
