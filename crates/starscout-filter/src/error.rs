//! Error types for stage evaluation and pipeline orchestration.

use starscout_core::{ScoutError, StageId};
use starscout_store::StoreError;
use thiserror::Error;

/// Errors produced by filter stages and the pipeline.
///
/// Stages reserve `Err` for contract violations and collaborator faults;
/// ordinary missing candidate data degrades to failing checks instead.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Criteria violate a stage's contract (e.g. non-positive windows).
    #[error("invalid criteria for {stage} stage: {reason}")]
    InvalidCriteria { stage: StageId, reason: String },

    /// A storage collaborator failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] ScoutError),
}
