//! Raw string backends behind each storage scope.
//!
//! Backends only move strings around. Serialisation and the "reads never fail" rule live
//! in [`crate::Storage`].

use crate::StorageResult;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A flat string-to-string store.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Returns the raw stored text for `key`, or `None` if absent or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: String) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;

    fn clear(&self) -> StorageResult<()>;
}

/// In-memory backend used for the session scope.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map; keep serving it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn write(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries().insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries().clear();
        Ok(())
    }
}

/// File backend used for the persistent scope.
///
/// The whole scope is one JSON object mapping keys to stored text. Each read loads and
/// parses the file again; each write rewrites it through a sibling temp file and a rename
/// so a crash mid-write leaves either the old or the new document.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, treating a missing or corrupt file as empty.
    fn load(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("failed to read storage file {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "storage file {} is not a valid document, reading as empty: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn write(&self, key: &str, value: String) -> StorageResult<()> {
        let mut entries = self.load();
        entries.insert(key.to_owned(), value);
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
