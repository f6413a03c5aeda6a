//! Filtering pipeline orchestration and batch recording.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use starscout_core::{
    criteria_digest, Candidate, CandidateId, FilterCriteria, PipelineOutcome, StageDetails,
    StageOutcome, StageStatus,
};
use starscout_store::{AssessmentSource, BatchId, BatchMetadata, BatchSummary, OutcomeSink};

use crate::activity::ActivityStage;
use crate::error::FilterError;
use crate::popularity::PopularityStage;
use crate::quality::QualityStage;
use crate::selection::SelectionStage;
use crate::stage::FilterStage;

/// Result of running a whole candidate batch through the pipeline.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Ledger batch the outcomes were recorded under.
    pub batch_id: BatchId,

    /// Per-candidate outcome ledgers, in input order.
    pub outcomes: Vec<PipelineOutcome>,

    /// Summary as recorded when the batch completed.
    pub summary: BatchSummary,
}

impl BatchOutcome {
    /// Candidates that passed every stage.
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed_all()).count()
    }
}

/// Orchestrates the four filter stages for one collection run.
///
/// Stages are visited in ascending identifier order; the order is a
/// configuration-time decision, never data-dependent, and no stage is
/// retried. Stages hold no cross-candidate mutable state, so independent
/// pipeline instances may evaluate candidates concurrently; each candidate
/// here is fully evaluated before the next begins.
pub struct FilterPipeline {
    stages: Vec<Box<dyn FilterStage>>,
    criteria: FilterCriteria,
    sink: Arc<dyn OutcomeSink>,
}

impl FilterPipeline {
    /// Standard four-stage pipeline with the reference instant taken now.
    pub fn new(
        criteria: FilterCriteria,
        sink: Arc<dyn OutcomeSink>,
        assessments: Arc<dyn AssessmentSource>,
    ) -> Self {
        Self::with_reference_time(criteria, sink, assessments, chrono::Utc::now())
    }

    /// Standard pipeline with a fixed activity reference instant, so a
    /// batch (or a test) evaluates every candidate against the same clock.
    pub fn with_reference_time(
        criteria: FilterCriteria,
        sink: Arc<dyn OutcomeSink>,
        assessments: Arc<dyn AssessmentSource>,
        reference_time: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let stages: Vec<Box<dyn FilterStage>> = vec![
            Box::new(PopularityStage),
            Box::new(ActivityStage::new(reference_time)),
            Box::new(QualityStage),
            Box::new(SelectionStage::new(assessments)),
        ];
        Self {
            stages,
            criteria,
            sink,
        }
    }

    /// Pipeline over an explicit stage list.
    ///
    /// Stage order must already be ascending; the pipeline never reorders
    /// at runtime. Intended for harnesses that substitute a stage.
    pub fn from_stages(
        stages: Vec<Box<dyn FilterStage>>,
        criteria: FilterCriteria,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            stages,
            criteria,
            sink,
        }
    }

    /// Evaluate one candidate through every stage, recording each outcome.
    ///
    /// Stop-on-failure semantics: a failed (or faulted) non-terminal stage
    /// stops evaluation and every remaining stage is recorded as skipped,
    /// so the returned ledger always has one entry per stage. A sink write
    /// failure is logged and tolerated; it never aborts the candidate.
    pub async fn run_candidate(
        &self,
        batch_id: &BatchId,
        candidate: &Candidate,
    ) -> PipelineOutcome {
        let mut outcomes: Vec<StageOutcome> = Vec::with_capacity(self.stages.len());
        let mut stopped_at = None;

        for stage in &self.stages {
            if let Some(cause) = stopped_at {
                let outcome = StageOutcome::skipped(stage.id(), cause);
                self.persist(batch_id, &candidate.id, &outcome).await;
                outcomes.push(outcome);
                continue;
            }

            let outcome = match stage.evaluate(candidate, &self.criteria).await {
                Ok(eval) => {
                    StageOutcome::evaluated(stage.id(), eval.passed, eval.score, eval.details)
                }
                Err(e) => {
                    warn!(
                        candidate = %candidate.id,
                        stage = %stage.id(),
                        error = %e,
                        "stage evaluation fault"
                    );
                    StageOutcome::errored(stage.id(), e.to_string())
                }
            };

            let failed = outcome.status == StageStatus::Failed;
            self.persist(batch_id, &candidate.id, &outcome).await;
            outcomes.push(outcome);

            if failed && !stage.id().is_terminal() {
                stopped_at = Some(stage.id());
            }
        }

        debug!(candidate = %candidate.id, stopped = ?stopped_at, "candidate evaluated");
        PipelineOutcome {
            candidate_id: candidate.id.clone(),
            outcomes,
        }
    }

    /// Run a whole candidate set under one ledger batch.
    ///
    /// Candidates are evaluated sequentially and in isolation: one
    /// candidate's fault never cancels its siblings.
    pub async fn run_batch(
        &self,
        candidates: &[Candidate],
        tags: serde_json::Value,
    ) -> Result<BatchOutcome, FilterError> {
        let start = Instant::now();

        let metadata = BatchMetadata {
            criteria_digest: criteria_digest(&self.criteria)?,
            tags,
        };
        let batch_id = self.sink.begin_batch(metadata).await?;
        info!(batch_id = %batch_id, candidates = candidates.len(), "starting filter batch");

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            outcomes.push(self.run_candidate(&batch_id, candidate).await);
        }

        let errored = outcomes.iter().filter(|o| candidate_errored(o)).count() as u64;
        let passed = outcomes.iter().filter(|o| o.passed_all()).count() as u64;
        let summary = BatchSummary {
            candidates: candidates.len() as u64,
            passed,
            failed: candidates.len() as u64 - passed - errored,
            errored,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        self.sink.complete_batch(&batch_id, summary.clone()).await?;
        info!(
            batch_id = %batch_id,
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            "filter batch completed"
        );

        Ok(BatchOutcome {
            batch_id,
            outcomes,
            summary,
        })
    }

    async fn persist(&self, batch_id: &BatchId, candidate_id: &CandidateId, outcome: &StageOutcome) {
        if let Err(e) = self.sink.record(batch_id, candidate_id, outcome).await {
            warn!(
                candidate = %candidate_id,
                stage = %outcome.stage,
                error = %e,
                "outcome write failed; continuing"
            );
        }
    }
}

/// Whether a candidate's run was stopped by an evaluation fault.
fn candidate_errored(outcome: &PipelineOutcome) -> bool {
    outcome
        .outcomes
        .iter()
        .any(|o| matches!(o.details, StageDetails::EvaluationError { .. }))
}
