use thiserror::Error;
use uuid::Uuid;

use bloom_core::error::CoreError;
use bloom_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("inconsistent {field}: recomputed {expected}, supplied {actual}")]
    InconsistentResult {
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("assessment not found: {id}")]
    NotFound { id: Uuid },

    #[error("storage unavailable during {operation}: {source}")]
    StorageUnavailable {
        operation: &'static str,
        #[source]
        source: StorageError,
    },

    /// A stored document that does not parse or does not deserialize as an
    /// assessment. Retrying will not help.
    #[error("malformed assessment document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),
}

impl RecordError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RecordError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Transient failures the caller may retry without recomputing. Corrupt
    /// documents surface as [`RecordError::Malformed`] and are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecordError::StorageUnavailable { .. })
    }
}
