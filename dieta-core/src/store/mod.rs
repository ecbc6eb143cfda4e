//! Key-value persistence and the versioned document envelope built on it.
//!
//! Every store in the crate persists one whole JSON document under one key.
//! Writes overwrite the document; there is no partial update and no locking,
//! so two writers doing read-modify-write on the same key can lose an update.
//!
//! # Keys
//!
//! - `foods`: envelope `{version: 1, data: Food[]}` (bare arrays still load)
//! - `planner_data`: envelope `{version: 1, data: {date_key: DailyPlan}}`
//! - `app_settings`: `{theme, language}`
//! - `user_info`: free-form personal data
//! - `presentation_mode`: `"true"` or `"false"`

mod document;
mod file;
mod key;
mod memory;

pub use document::{Migration, Validator, VersionedDocument, VersionedDocumentStore};
pub use file::FileStore;
pub use key::StoreKey;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Minimal key-value primitive the stores are written against.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// Errors raised by a [`KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum KvError {
    /// I/O error reading or writing a file.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
