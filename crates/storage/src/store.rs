use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::{Scope, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

/// Two-scope key-value store.
///
/// `Storage` is `Send + Sync` and intended to be shared behind an `Arc`. It holds no
/// cached values of its own.
#[derive(Debug)]
pub struct Storage {
    session: Box<dyn StorageBackend>,
    persistent: Box<dyn StorageBackend>,
}

impl Storage {
    /// Session scope in memory, persistent scope in the JSON file at `path`.
    ///
    /// Nothing is read or created until the first operation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backends(MemoryBackend::new(), FileBackend::new(path))
    }

    /// Both scopes in memory. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::with_backends(MemoryBackend::new(), MemoryBackend::new())
    }

    pub fn with_backends(
        session: impl StorageBackend + 'static,
        persistent: impl StorageBackend + 'static,
    ) -> Self {
        Self {
            session: Box::new(session),
            persistent: Box::new(persistent),
        }
    }

    fn backend(&self, scope: Scope) -> &dyn StorageBackend {
        match scope {
            Scope::Session => self.session.as_ref(),
            Scope::Persistent => self.persistent.as_ref(),
        }
    }

    /// Reads and deserialises the value under `key`.
    ///
    /// Returns `None` when the key is absent or the stored text does not parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, scope: Scope, key: &str) -> Option<T> {
        let raw = self.backend(scope).read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("{scope} storage key '{key}' did not parse: {e}");
                None
            }
        }
    }

    /// Whether anything is stored under `key`, parsable or not.
    pub fn contains(&self, scope: Scope, key: &str) -> bool {
        self.backend(scope).read(key).is_some()
    }

    /// Serialises `value` as JSON and stores it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, scope: Scope, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend(scope).write(key, raw)
    }

    pub fn remove(&self, scope: Scope, key: &str) -> StorageResult<()> {
        self.backend(scope).remove(key)
    }

    /// Empties one scope.
    pub fn clear(&self, scope: Scope) -> StorageResult<()> {
        self.backend(scope).clear()
    }

    /// Empties both scopes.
    ///
    /// Both scopes are attempted even if the first one fails; the first error is returned.
    pub fn clear_all(&self) -> StorageResult<()> {
        let persistent = self.persistent.clear();
        let session = self.session.clear();
        persistent.and(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        id: u32,
        name: String,
    }

    fn file_storage(temp: &TempDir) -> Storage {
        Storage::open(temp.path().join("storage.json"))
    }

    #[test]
    fn set_then_get_returns_same_value_for_each_kind() {
        let temp = TempDir::new().unwrap();
        let storage = file_storage(&temp);

        for scope in [Scope::Session, Scope::Persistent] {
            storage.set(scope, "s", "hello").unwrap();
            storage.set(scope, "n", &42).unwrap();
            storage.set(scope, "f", &1.5).unwrap();
            storage.set(scope, "b", &false).unwrap();
            storage.set(scope, "o", &json!({"a": [1, 2], "b": null})).unwrap();

            assert_eq!(storage.get::<String>(scope, "s").as_deref(), Some("hello"));
            assert_eq!(storage.get::<i64>(scope, "n"), Some(42));
            assert_eq!(storage.get::<f64>(scope, "f"), Some(1.5));
            assert_eq!(storage.get::<bool>(scope, "b"), Some(false));
            assert_eq!(
                storage.get::<serde_json::Value>(scope, "o"),
                Some(json!({"a": [1, 2], "b": null}))
            );
        }
    }

    #[test]
    fn typed_objects_round_trip() {
        let storage = Storage::in_memory();
        let profile = Profile {
            id: 7,
            name: "Dr. Smith".into(),
        };
        storage.set(Scope::Persistent, "user", &profile).unwrap();
        assert_eq!(storage.get(Scope::Persistent, "user"), Some(profile));
    }

    #[test]
    fn contains_sees_unparsable_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("storage.json");
        std::fs::write(&path, r#"{"user":"{broken"}"#).unwrap();
        let storage = Storage::open(&path);

        assert!(storage.contains(Scope::Persistent, "user"));
        assert_eq!(storage.get::<serde_json::Value>(Scope::Persistent, "user"), None);
        assert!(!storage.contains(Scope::Persistent, "token"));
        assert!(!storage.contains(Scope::Session, "user"));
    }

    #[test]
    fn absent_key_reads_none() {
        let temp = TempDir::new().unwrap();
        let storage = file_storage(&temp);
        assert_eq!(storage.get::<String>(Scope::Session, "missing"), None);
        assert_eq!(storage.get::<String>(Scope::Persistent, "missing"), None);
    }

    #[test]
    fn wrong_shape_reads_none() {
        let storage = Storage::in_memory();
        storage.set(Scope::Session, "user", "not a profile").unwrap();
        assert_eq!(storage.get::<Profile>(Scope::Session, "user"), None);
    }

    #[test]
    fn scopes_are_independent() {
        let storage = Storage::in_memory();
        storage.set(Scope::Session, "k", "session").unwrap();
        assert_eq!(storage.get::<String>(Scope::Persistent, "k"), None);

        storage.clear(Scope::Session).unwrap();
        storage.set(Scope::Persistent, "k", "persistent").unwrap();
        assert_eq!(storage.get::<String>(Scope::Session, "k"), None);
        assert_eq!(
            storage.get::<String>(Scope::Persistent, "k").as_deref(),
            Some("persistent")
        );
    }

    #[test]
    fn remove_deletes_single_entry() {
        let storage = Storage::in_memory();
        storage.set(Scope::Persistent, "a", &1).unwrap();
        storage.set(Scope::Persistent, "b", &2).unwrap();
        storage.remove(Scope::Persistent, "a").unwrap();
        assert_eq!(storage.get::<i32>(Scope::Persistent, "a"), None);
        assert_eq!(storage.get::<i32>(Scope::Persistent, "b"), Some(2));
    }

    #[test]
    fn clear_all_empties_both_scopes() {
        let temp = TempDir::new().unwrap();
        let storage = file_storage(&temp);
        storage.set(Scope::Session, "tab", "history").unwrap();
        storage.set(Scope::Persistent, "token", "abc").unwrap();

        storage.clear_all().unwrap();

        assert_eq!(storage.get::<String>(Scope::Session, "tab"), None);
        assert_eq!(storage.get::<String>(Scope::Persistent, "token"), None);
    }

    #[test]
    fn persistent_scope_survives_reopen() {
        let temp = TempDir::new().unwrap();
        file_storage(&temp)
            .set(Scope::Persistent, "token", "abc")
            .unwrap();

        let reopened = file_storage(&temp);
        assert_eq!(
            reopened.get::<String>(Scope::Persistent, "token").as_deref(),
            Some("abc")
        );
        assert_eq!(reopened.get::<String>(Scope::Session, "token"), None);
    }
}
