//! Key-value state store
//!
//! Two operations only: get and put by string key. There are no transactions,
//! no conditional writes, and no TTL semantics. The store is the sole source
//! of truth across instances; nothing is cached in process.

use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::StateError;

/// Flat string-keyed store holding the vault's transient state.
///
/// Implementations must be safe to share across request handlers.
pub trait KvStore: Send + Sync {
    /// Read a value; an unset key yields `None` (callers treat it as empty).
    fn get(&self, key: &str) -> Result<Option<String>, StateError>;

    /// Write a value, fully replacing any previous one.
    fn put(&self, key: &str, value: &str) -> Result<(), StateError>;
}

/// Filesystem-backed store: one file per key under a state directory.
pub struct FsKvStore {
    root: PathBuf,
}

impl FsKvStore {
    /// Opens the store, creating the state directory if needed.
    pub fn open(root: PathBuf) -> Result<Self, StateError> {
        fs::create_dir_all(&root)?;
        info!("State directory: {}", root.display());
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StateError> {
        // Keys are fixed well-known names; reject anything path-like outright.
        if key.is_empty() || key.contains(['/', '\\', '\0']) || key.contains("..") {
            return Err(StateError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl KvStore for FsKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StateError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::from(e)),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StateError> {
        let path = self.key_path(key)?;

        // Write through a temp file so a crashed write never leaves a
        // half-written value behind.
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}
