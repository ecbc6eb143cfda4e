//! Error type shared by every store in the crate.

use thiserror::Error;

use crate::store::KvError;

/// Errors returned by the document, catalog, planner and settings stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A document or record is malformed or missing required fields.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// The update or delete target does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// An import produced zero usable records.
    #[error("No valid entries found")]
    NoValidEntries,
    /// Serialization or I/O failure in the underlying storage.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Message suitable for showing to a user.
    ///
    /// Validation and lookup errors are specific; storage errors are
    /// reported generically and should be logged by the caller.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Storage(_) => "An error occurred while reading or saving data".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(e: KvError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_storage_details() {
        let err = StoreError::Storage("disk on fire".into());
        assert!(!err.user_message().contains("disk on fire"));

        let err = StoreError::NotFound("abc".into());
        assert_eq!(err.user_message(), "Not found: abc");
    }

    #[test]
    fn test_json_error_maps_to_storage() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
