//! Client-side key-value storage
//!
//! This crate provides the two storage scopes the dashboard client keeps state in:
//!
//! - **Session** scope lives in memory and disappears when the process exits
//! - **Persistent** scope is a single JSON document on disk that survives restarts
//!
//! Values are stored as serialised JSON text, so anything implementing `serde::Serialize`
//! (objects, strings, numbers, booleans) can be written, and read back into any type
//! implementing `serde::de::DeserializeOwned`.
//!
//! ## Read semantics
//!
//! Reads never fail. A missing key, a missing backing file, or stored text that does not
//! parse into the requested type all read as `None`. There is no cache in front of the
//! persistent scope: every read goes back to disk and re-parses.
//!
//! ## Example Usage
//!
//! ```no_run
//! use rx_storage::{Scope, Storage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Storage::open("rx_data/storage.json");
//! storage.set(Scope::Persistent, "token", &"abc.def.ghi")?;
//! let token: Option<String> = storage.get(Scope::Persistent, "token");
//! storage.clear_all()?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use store::Storage;

/// Which of the two stores an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// In-memory, process lifetime.
    Session,
    /// On-disk, survives restarts.
    Persistent,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Session => write!(f, "session"),
            Scope::Persistent => write!(f, "persistent"),
        }
    }
}

/// Errors that can occur while writing to storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backing file could not be written or replaced
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialised to JSON
    #[error("failed to serialise value: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
