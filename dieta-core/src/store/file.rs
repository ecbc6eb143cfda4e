//! File-backed key-value store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, KvError};

/// Stores each key as `<key>.json` inside a data directory.
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a reader never observes a half-written document.
#[derive(Clone, Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Checks if a key exists on disk.
    pub fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }

    fn io_error(path: &Path, source: io::Error) -> KvError {
        KvError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| Self::io_error(&self.data_dir, e))?;

        let path = self.path(key);
        let staging = self.data_dir.join(format!("{}.json.tmp", key));

        fs::write(&staging, value).map_err(|e| Self::io_error(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| Self::io_error(&path, e))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_path_uses_json_extension() {
        let (store, _temp) = test_store();
        assert!(store.path("foods").ends_with("foods.json"));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (store, _temp) = test_store();
        assert_eq!(store.get("foods").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = FileStore::new(nested.clone());

        store.set("foods", "[]").unwrap();

        assert!(nested.exists());
        assert!(store.exists("foods"));
        assert!(!nested.join("foods.json.tmp").exists());
    }

    #[test]
    fn test_set_then_get() {
        let (store, _temp) = test_store();
        store.set("app_settings", r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(
            store.get("app_settings").unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );
    }

    #[test]
    fn test_set_overwrites() {
        let (store, _temp) = test_store();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let (store, _temp) = test_store();
        store.remove("never_written").unwrap();
    }

    #[test]
    fn test_remove_deletes_file() {
        let (store, _temp) = test_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(!store.exists("k"));
        assert_eq!(store.get("k").unwrap(), None);
    }
}
