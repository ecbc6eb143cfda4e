//! Versioned whole-document storage over a single key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// On-disk envelope for every versioned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDocument<T> {
    pub version: u32,
    pub data: T,
}

/// A named predicate a document must satisfy before it is written.
pub struct Validator<T> {
    pub name: &'static str,
    pub check: fn(&T) -> bool,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Validator<T> {}

/// Upgrades raw document data written at `from_version` to the current shape.
pub type Migration = fn(Value, u32) -> StoreResult<Value>;

/// Loads and saves one document of type `T` under one key.
///
/// Saved documents are wrapped as `{version, data}`. On load, documents
/// written by an older version run through the migration hook (the result
/// is not written back), and bare documents without an envelope are
/// accepted as-is for backward compatibility.
pub struct VersionedDocumentStore<'a, T> {
    kv: &'a dyn KeyValueStore,
    key: String,
    version: u32,
    validators: Vec<Validator<T>>,
    migration: Option<Migration>,
}

impl<'a, T> VersionedDocumentStore<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(kv: &'a dyn KeyValueStore, key: impl Into<String>, version: u32) -> Self {
        Self {
            kv,
            key: key.into(),
            version,
            validators: Vec::new(),
            migration: None,
        }
    }

    /// Appends a validator. Validators run in insertion order.
    pub fn with_validator(mut self, name: &'static str, check: fn(&T) -> bool) -> Self {
        self.validators.push(Validator { name, check });
        self
    }

    pub fn with_migration(mut self, migration: Migration) -> Self {
        self.migration = Some(migration);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Runs every validator; the first failure is reported by name.
    pub fn validate(&self, document: &T) -> StoreResult<()> {
        match self.validators.iter().find(|v| !(v.check)(document)) {
            Some(failed) => Err(StoreError::ValidationFailed(failed.name.to_string())),
            None => Ok(()),
        }
    }

    /// Validates and overwrites the stored document, returning it back.
    pub fn save(&self, document: T) -> StoreResult<T> {
        self.validate(&document)?;

        let envelope = VersionedDocument {
            version: self.version,
            data: &document,
        };
        let json = serde_json::to_string(&envelope)?;
        self.kv.set(&self.key, &json)?;

        tracing::debug!(key = %self.key, version = self.version, "saved document");
        Ok(document)
    }

    /// Loads the stored document.
    ///
    /// Returns `Ok(None)` if nothing is stored under the key.
    pub fn load(&self) -> StoreResult<Option<T>> {
        let raw = match self.kv.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let value: Value = serde_json::from_str(&raw)?;

        let data = match split_envelope(value) {
            (Some(stored), data) if stored < self.version => match self.migration {
                Some(migrate) => {
                    tracing::info!(
                        key = %self.key,
                        from = stored,
                        to = self.version,
                        "migrating document"
                    );
                    migrate(data, stored)?
                }
                None => data,
            },
            (Some(stored), data) => {
                if stored > self.version {
                    tracing::warn!(
                        key = %self.key,
                        stored,
                        supported = self.version,
                        "document written by a newer version"
                    );
                }
                data
            }
            (None, legacy) => {
                tracing::debug!(key = %self.key, "loaded unversioned document");
                legacy
            }
        };

        Ok(Some(serde_json::from_value(data)?))
    }

    /// Removes the stored document. An absent key is not an error.
    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(&self.key)?;
        Ok(())
    }
}

/// Splits a raw document into its envelope version and payload.
///
/// Only an object with exactly `version` (unsigned integer) and `data`
/// counts as an envelope; anything else is a legacy bare document.
fn split_envelope(value: Value) -> (Option<u32>, Value) {
    match value {
        Value::Object(mut map) if is_envelope(&map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok());
            let data = map.remove("data").unwrap_or(Value::Null);
            (version, data)
        }
        other => (None, other),
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.len() == 2
        && map.contains_key("data")
        && map
            .get("version")
            .and_then(Value::as_u64)
            .is_some_and(|v| u32::try_from(v).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        #[serde(default)]
        pinned: bool,
    }

    fn store(kv: &MemoryStore) -> VersionedDocumentStore<'_, Vec<Note>> {
        VersionedDocumentStore::new(kv, "notes", 2)
            .with_validator("titles must not be empty", |notes: &Vec<Note>| {
                notes.iter().all(|n| !n.title.is_empty())
            })
    }

    fn note(title: &str) -> Note {
        Note {
            title: title.to_string(),
            pinned: false,
        }
    }

    #[test]
    fn test_load_missing_returns_none() {
        let kv = MemoryStore::new();
        assert_eq!(store(&kv).load().unwrap(), None);
    }

    #[test]
    fn test_save_wraps_in_envelope() {
        let kv = MemoryStore::new();
        store(&kv).save(vec![note("a")]).unwrap();

        let raw: Value = serde_json::from_str(&kv.get("notes").unwrap().unwrap()).unwrap();
        assert_eq!(raw["version"], json!(2));
        assert_eq!(raw["data"][0]["title"], json!("a"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let kv = MemoryStore::new();
        let docs = store(&kv);
        let saved = docs.save(vec![note("a"), note("b")]).unwrap();
        assert_eq!(docs.load().unwrap(), Some(saved));
    }

    #[test]
    fn test_validation_failure_does_not_write() {
        let kv = MemoryStore::new();
        let docs = store(&kv);
        docs.save(vec![note("kept")]).unwrap();

        let err = docs.save(vec![note("")]).unwrap_err();
        assert_eq!(
            err,
            StoreError::ValidationFailed("titles must not be empty".into())
        );
        assert_eq!(docs.load().unwrap(), Some(vec![note("kept")]));
    }

    #[test]
    fn test_validators_run_in_order() {
        let kv = MemoryStore::new();
        let docs = VersionedDocumentStore::<Vec<Note>>::new(&kv, "notes", 1)
            .with_validator("first", |_| false)
            .with_validator("second", |_| false);

        let err = docs.validate(&Vec::new()).unwrap_err();
        assert_eq!(err, StoreError::ValidationFailed("first".into()));
    }

    #[test]
    fn test_legacy_bare_document_loads() {
        let kv = MemoryStore::new();
        kv.set("notes", r#"[{"title":"old"}]"#).unwrap();
        assert_eq!(store(&kv).load().unwrap(), Some(vec![note("old")]));
    }

    #[test]
    fn test_older_version_runs_migration() {
        let kv = MemoryStore::new();
        kv.set("notes", r#"{"version":1,"data":[{"name":"renamed"}]}"#)
            .unwrap();

        let docs = store(&kv).with_migration(|data, from| {
            assert_eq!(from, 1);
            let notes = data
                .as_array()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|n| json!({ "title": n["name"] }))
                .collect();
            Ok(Value::Array(notes))
        });

        assert_eq!(docs.load().unwrap(), Some(vec![note("renamed")]));
        // Migration result is not written back.
        assert!(kv.get("notes").unwrap().unwrap().contains("\"version\":1"));
    }

    #[test]
    fn test_migration_error_propagates() {
        let kv = MemoryStore::new();
        kv.set("notes", r#"{"version":1,"data":[]}"#).unwrap();
        let docs = store(&kv)
            .with_migration(|_, _| Err(StoreError::Storage("cannot migrate".into())));
        assert_eq!(
            docs.load().unwrap_err(),
            StoreError::Storage("cannot migrate".into())
        );
    }

    #[test]
    fn test_newer_version_loads_without_migration() {
        let kv = MemoryStore::new();
        kv.set("notes", r#"{"version":9,"data":[{"title":"future"}]}"#)
            .unwrap();
        let docs = store(&kv).with_migration(|_, _| panic!("must not migrate"));
        assert_eq!(docs.load().unwrap(), Some(vec![note("future")]));
    }

    #[test]
    fn test_object_with_extra_keys_is_not_an_envelope() {
        let kv = MemoryStore::new();
        let docs = VersionedDocumentStore::<Value>::new(&kv, "raw", 1);
        kv.set("raw", r#"{"version":1,"data":2,"other":3}"#).unwrap();
        assert_eq!(
            docs.load().unwrap(),
            Some(json!({"version": 1, "data": 2, "other": 3}))
        );
    }

    #[test]
    fn test_corrupt_document_is_storage_error() {
        let kv = MemoryStore::new();
        kv.set("notes", "{not json").unwrap();
        assert!(matches!(
            store(&kv).load().unwrap_err(),
            StoreError::Storage(_)
        ));
    }

    #[test]
    fn test_clear_removes_document() {
        let kv = MemoryStore::new();
        let docs = store(&kv);
        docs.clear().unwrap();
        docs.save(vec![note("x")]).unwrap();
        docs.clear().unwrap();
        assert_eq!(docs.load().unwrap(), None);
    }
}
