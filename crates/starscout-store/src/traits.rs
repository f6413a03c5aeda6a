//! Storage trait definitions for StarScout
//!
//! These traits define the collaborator seams of the filtering core:
//! - `CandidateSource`: candidate records per search predicate
//! - `OutcomeSink`: batch ledger for per-stage outcomes
//! - `AssessmentSource`: aggregate assessments keyed by candidate identity
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use starscout_core::{Candidate, CandidateId, QualityAssessment, StageOutcome};

use crate::error::StoreResult;

// ---------------------------------------------------------------------------
// Batch ledger records
// ---------------------------------------------------------------------------

/// Unique identifier for a collection batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub String);

impl BatchId {
    /// Generate a new random BatchId
    pub fn new() -> Self {
        BatchId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata attached to a batch at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Digest of the criteria set the batch ran under
    pub criteria_digest: String,
    /// Arbitrary key-value tags
    pub tags: serde_json::Value,
}

/// Summary produced when a batch completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Candidates fed into the pipeline
    pub candidates: u64,
    /// Candidates that passed every stage
    pub passed: u64,
    /// Candidates stopped by a failing stage
    pub failed: u64,
    /// Candidates stopped by an evaluation fault
    pub errored: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Status of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Running,
    Completed,
}

/// Full batch record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: BatchId,
    pub metadata: BatchMetadata,
    pub status: BatchStatus,
    pub summary: Option<BatchSummary>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One stage outcome as recorded in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedOutcome {
    pub candidate_id: CandidateId,
    pub outcome: StageOutcome,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CandidateSource — Search Result Supply
// ---------------------------------------------------------------------------

/// Candidate record source.
///
/// Guarantees:
/// - `fetch` returns a finite, ordered sequence for a search predicate.
/// - The core does not care whether the backend paginates, caches, or
///   rate-limits; those concerns stay behind this trait.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetch up to `limit` candidates matching a search predicate.
    async fn fetch(&self, predicate: &str, limit: usize) -> StoreResult<Vec<Candidate>>;
}

// ---------------------------------------------------------------------------
// OutcomeSink — Batch Outcome Ledger
// ---------------------------------------------------------------------------

/// Durable sink for per-stage outcomes.
///
/// Guarantees:
/// - Recorded outcomes are append-only facts, never updated in place.
/// - A batch transitions: Running → Completed (terminal).
/// - Completed batches reject further writes.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    /// Open a new batch, returning its unique ID.
    async fn begin_batch(&self, metadata: BatchMetadata) -> StoreResult<BatchId>;

    /// Append one stage outcome. Fails if the batch is completed.
    async fn record(
        &self,
        batch_id: &BatchId,
        candidate_id: &CandidateId,
        outcome: &StageOutcome,
    ) -> StoreResult<()>;

    /// Mark a batch as completed with a summary.
    async fn complete_batch(&self, batch_id: &BatchId, summary: BatchSummary) -> StoreResult<()>;

    /// Retrieve a batch record by ID.
    async fn get_batch(&self, batch_id: &BatchId) -> StoreResult<BatchRecord>;

    /// Retrieve all outcomes recorded in a batch, in recording order.
    async fn outcomes(&self, batch_id: &BatchId) -> StoreResult<Vec<RecordedOutcome>>;
}

// ---------------------------------------------------------------------------
// AssessmentSource — Aggregate Assessment Supply
// ---------------------------------------------------------------------------

/// Source of precomputed aggregate assessments.
///
/// Assessments are produced by a ranking pass over the full candidate set;
/// the final selection stage reads them through this trait. Absence of an
/// assessment is an ordinary answer, not an error.
#[async_trait]
pub trait AssessmentSource: Send + Sync {
    /// Assessment for one candidate, if the ranking pass covered it.
    async fn assessment_for(
        &self,
        candidate_id: &CandidateId,
    ) -> StoreResult<Option<QualityAssessment>>;

    /// Total number of candidates the ranking pass assessed.
    async fn total_assessed(&self) -> StoreResult<usize>;
}
