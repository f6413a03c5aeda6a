//! Stage outcomes and the per-candidate evaluation ledger.
//!
//! A `StageOutcome` is produced once per (candidate, stage) pair and is
//! append-only: the pipeline writes it to the sink and never updates it in
//! place. A `PipelineOutcome` is the ordered ledger for one candidate and
//! always contains one entry per stage, with stages after a stopping point
//! recorded as skipped rather than omitted.

use serde::{Deserialize, Serialize};

/// Ordered identifiers for the four filter stages.
///
/// Stage order is fixed and total; the pipeline visits stages in this
/// order and never reorders them at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Popularity,
    Activity,
    Quality,
    FinalSelection,
}

impl StageId {
    /// All stages in evaluation order.
    pub const ORDERED: [StageId; 4] = [
        StageId::Popularity,
        StageId::Activity,
        StageId::Quality,
        StageId::FinalSelection,
    ];

    /// Stage name as recorded in the outcome ledger.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Popularity => "popularity",
            StageId::Activity => "activity",
            StageId::Quality => "quality",
            StageId::FinalSelection => "final_selection",
        }
    }

    /// 1-based position in evaluation order.
    pub fn number(&self) -> u8 {
        match self {
            StageId::Popularity => 1,
            StageId::Activity => 2,
            StageId::Quality => 3,
            StageId::FinalSelection => 4,
        }
    }

    /// Whether this is the terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageId::FinalSelection)
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ledger status of a stage outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Passed,
    Failed,
    Skipped,
}

/// Structured per-stage detail payload.
///
/// One variant per stage, plus markers for skipped stages, missing
/// assessments, and evaluation faults. `checks_failed` lists the names of
/// the checks that did not hold (empty on a pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageDetails {
    Popularity {
        stars: u64,
        forks: u64,
        star_score: f64,
        fork_score: f64,
        archived: bool,
        disabled: bool,
        checks_failed: Vec<String>,
    },

    Activity {
        days_since_push: i64,
        days_since_update: i64,
        push_score: f64,
        update_score: f64,
        open_issue_score: f64,
        /// Contributor counts are not verifiable from search metadata.
        contributors_verified: bool,
        checks_failed: Vec<String>,
    },

    Quality {
        license: Option<String>,
        description_ok: bool,
        homepage_present: bool,
        topic_score: f64,
        feature_score: f64,
        /// Placeholder score carried from criteria; not part of the mean.
        readme_score: f64,
        readme_verified: bool,
        checks_failed: Vec<String>,
    },

    Selection {
        overall_score: f64,
        rank: usize,
        total_assessed: usize,
        /// Diagnostic only: round(((total - rank + 1) / total) * 100).
        percentile_rank: u32,
        rank_cutoff: usize,
        checks_failed: Vec<String>,
    },

    /// Final selection ran without a precomputed assessment.
    NoAssessment,

    /// Stage was not evaluated because an earlier stage stopped the run.
    SkippedAfter { stage: StageId },

    /// Stage evaluation raised; the message is the fault description.
    EvaluationError { message: String },
}

/// Outcome of one stage for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: StageId,
    pub passed: bool,

    /// Normalized score in [0, 1], independent of pass/fail: a failing
    /// candidate may still carry a nonzero score for diagnostic ranking.
    pub score: f64,

    pub status: StageStatus,
    pub details: StageDetails,
}

impl StageOutcome {
    /// Outcome for an evaluated stage; status follows `passed`.
    pub fn evaluated(stage: StageId, passed: bool, score: f64, details: StageDetails) -> Self {
        Self {
            stage,
            passed,
            score,
            status: if passed {
                StageStatus::Passed
            } else {
                StageStatus::Failed
            },
            details,
        }
    }

    /// Marker outcome for a stage skipped after `after` stopped the run.
    pub fn skipped(stage: StageId, after: StageId) -> Self {
        Self {
            stage,
            passed: false,
            score: 0.0,
            status: StageStatus::Skipped,
            details: StageDetails::SkippedAfter { stage: after },
        }
    }

    /// Failed outcome recording an evaluation fault.
    pub fn errored(stage: StageId, message: impl Into<String>) -> Self {
        Self {
            stage,
            passed: false,
            score: 0.0,
            status: StageStatus::Failed,
            details: StageDetails::EvaluationError {
                message: message.into(),
            },
        }
    }
}

/// Ordered ledger of stage outcomes for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub candidate_id: crate::candidate::CandidateId,
    pub outcomes: Vec<StageOutcome>,
}

impl PipelineOutcome {
    /// Whether every stage was evaluated and passed.
    pub fn passed_all(&self) -> bool {
        self.outcomes.len() == StageId::ORDERED.len()
            && self.outcomes.iter().all(|o| o.status == StageStatus::Passed)
    }

    /// Number of stages with status `Passed`.
    pub fn passed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == StageStatus::Passed)
            .count()
    }

    /// Number of stages with status `Failed`.
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == StageStatus::Failed)
            .count()
    }

    /// The stage that stopped the run, if any.
    pub fn stopped_at(&self) -> Option<StageId> {
        self.outcomes
            .iter()
            .find(|o| o.status == StageStatus::Failed)
            .map(|o| o.stage)
    }

    /// Ledger invariant: one outcome per stage, ascending order, no gaps,
    /// and nothing evaluated after a skip marker.
    pub fn is_well_formed(&self) -> bool {
        if self.outcomes.len() != StageId::ORDERED.len() {
            return false;
        }
        let ordered = self
            .outcomes
            .iter()
            .zip(StageId::ORDERED.iter())
            .all(|(o, id)| o.stage == *id);
        let mut seen_skip = false;
        for outcome in &self.outcomes {
            if seen_skip && outcome.status != StageStatus::Skipped {
                return false;
            }
            if outcome.status == StageStatus::Skipped {
                seen_skip = true;
            }
        }
        ordered
    }
}
