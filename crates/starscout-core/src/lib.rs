//! StarScout Core - domain model for candidate collection and filtering
//!
//! Defines the records that flow through the filtering pipeline:
//! - `Candidate`: a repository record subjected to multi-stage evaluation
//! - `FilterCriteria`: externally supplied thresholds, one record per stage
//! - `StageOutcome` / `PipelineOutcome`: the append-only evaluation ledger
//! - `QualityAssessment`: precomputed aggregate consumed by final selection
//!
//! Scoring helpers and the criteria digest live here so every crate shares
//! one definition of "normalized score" and "criteria identity".

pub mod assessment;
pub mod candidate;
pub mod criteria;
pub mod digest;
pub mod error;
pub mod outcome;
pub mod score;

pub use assessment::{rank_cutoff, QualityAssessment};
pub use candidate::{Candidate, CandidateId};
pub use criteria::{
    ActivityCriteria, Criterion, FilterCriteria, PopularityCriteria, QualityCriteria,
    SelectionCriteria,
};
pub use digest::{criteria_digest, json_digest};
pub use error::{Result, ScoutError};
pub use outcome::{PipelineOutcome, StageDetails, StageId, StageOutcome, StageStatus};

/// StarScout core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
