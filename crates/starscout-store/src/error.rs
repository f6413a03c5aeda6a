//! Error types for the storage layer.

use thiserror::Error;

/// Errors produced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No batch with this identifier.
    #[error("batch not found: {batch_id}")]
    BatchNotFound { batch_id: String },

    /// Operation requires the batch in a different state.
    #[error("batch {batch_id} is {status}, expected {expected}")]
    InvalidBatchState {
        batch_id: String,
        status: String,
        expected: String,
    },

    /// Backend rejected or lost a write.
    #[error("write failed: {reason}")]
    WriteFailed { reason: String },

    /// Query against the backing source failed.
    #[error("query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
