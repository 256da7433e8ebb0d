// Local storage module
// Key/value persistence of JSON documents, one document per key

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// File I/O error
    #[error("IO error for key {key}: {source}")]
    Io {
        /// Storage key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error for key {key}: {source}")]
    Json {
        /// Storage key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters that cannot name a file
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// In-memory storage lock was poisoned
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key/value store holding persisted documents
///
/// Each write replaces the whole value of one key; there is no transaction
/// spanning several keys.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode the JSON document stored under `key`
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, &json)
}

/// Storage keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory; it is created on first write
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write next to the target and rename so readers never see half a file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes()).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Storage kept in memory, used by tests and as a last resort
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.get_item("chatHistory").unwrap(), None);

        storage.set_item("chatHistory", "[1,2,3]").unwrap();
        assert_eq!(
            storage.get_item("chatHistory").unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert!(temp_dir.path().join("nested/chatHistory.json").exists());
        assert!(!temp_dir.path().join("nested/chatHistory.json.tmp").exists());

        storage.remove_item("chatHistory").unwrap();
        assert_eq!(storage.get_item("chatHistory").unwrap(), None);
        // Removing twice is fine
        storage.remove_item("chatHistory").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let err = storage.set_item("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn test_json_helpers() {
        let storage = MemoryStorage::new();
        save_json(&storage, "numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&storage, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = load_json(&storage, "absent").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_load_json_reports_corruption() {
        let storage = MemoryStorage::new();
        storage.set_item("numbers", "{not json").unwrap();
        let err = load_json::<Vec<u32>>(&storage, "numbers").unwrap_err();
        assert!(err.to_string().contains("numbers"));
    }
}
