//! Filter stage contract.

use async_trait::async_trait;

use starscout_core::{Candidate, FilterCriteria, StageDetails, StageId};

use crate::error::FilterError;

/// Result of evaluating one candidate at one stage.
#[derive(Debug, Clone)]
pub struct StageEvaluation {
    /// Whether every enforced check held.
    pub passed: bool,

    /// Normalized score in [0, 1], independent of `passed`.
    pub score: f64,

    /// Structured detail record for the outcome ledger.
    pub details: StageDetails,
}

/// One gate in the filtering pipeline.
///
/// Implementations must be deterministic given identical inputs and free of
/// side effects; persistence is the pipeline's responsibility, not the
/// stage's. Missing or zero-valued candidate data degrades to failing
/// checks and low scores, never an `Err` - errors are reserved for
/// contract violations and collaborator faults, and the pipeline decides
/// how those are handled.
#[async_trait]
pub trait FilterStage: Send + Sync {
    /// Position of this stage in pipeline order.
    fn id(&self) -> StageId;

    /// Evaluate one candidate against the run criteria.
    async fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &FilterCriteria,
    ) -> Result<StageEvaluation, FilterError>;
}
