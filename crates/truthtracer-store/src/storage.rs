use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// String key-value storage, the local equivalent of a browser's `localStorage`.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.item_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete blob: write a sibling, then rename.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.item_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        items.remove(key);
        Ok(())
    }
}

/// Storage for contexts that have none. Every call fails with `Unavailable`.
pub struct UnavailableStorage;

impl Storage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_dir_reads_none() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("not-created-yet"));
        assert_eq!(storage.get_item("factResult").unwrap(), None);
    }

    #[test]
    fn file_storage_set_get_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("data"));

        storage.set_item("factResult", "[1,2]").unwrap();
        assert_eq!(
            storage.get_item("factResult").unwrap().as_deref(),
            Some("[1,2]")
        );
        assert!(tmp.path().join("data/factResult.json").exists());
        assert!(!tmp.path().join("data/factResult.json.tmp").exists());

        storage.set_item("factResult", "[]").unwrap();
        assert_eq!(storage.get_item("factResult").unwrap().as_deref(), Some("[]"));

        storage.remove_item("factResult").unwrap();
        assert_eq!(storage.get_item("factResult").unwrap(), None);
    }

    #[test]
    fn file_storage_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());
        assert!(storage.remove_item("nothing").is_ok());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());
        for key in ["../escape", "a/b", "", "dot.key"] {
            let err = storage.set_item(key, "x").unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn unavailable_storage_fails_every_call() {
        let storage = UnavailableStorage;
        assert!(matches!(
            storage.get_item("k"),
            Err(StorageError::Unavailable)
        ));
        assert!(storage.set_item("k", "v").is_err());
        assert!(storage.remove_item("k").is_err());
    }
}
