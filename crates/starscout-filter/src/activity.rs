//! Activity stage: push/update recency windows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use starscout_core::score::{days_since, mean, recency_score, volume_score};
use starscout_core::{Candidate, FilterCriteria, StageDetails, StageId};

use crate::error::FilterError;
use crate::stage::{FilterStage, StageEvaluation};

/// Open-issue count at which the activity-volume sub-score saturates.
const OPEN_ISSUE_CAP: u64 = 50;

/// Second gate: recency of pushes and metadata updates.
///
/// Holds a fixed reference instant so evaluation is deterministic; build
/// one per batch. A missing timestamp yields the maximum representable day
/// count and fails its window check. The contributor criterion is advisory
/// only - contributor counts are not available from search metadata, so it
/// is recorded as unverified and never gates.
pub struct ActivityStage {
    reference_time: DateTime<Utc>,
}

impl ActivityStage {
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        Self { reference_time }
    }
}

impl Default for ActivityStage {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

#[async_trait]
impl FilterStage for ActivityStage {
    fn id(&self) -> StageId {
        StageId::Activity
    }

    async fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &FilterCriteria,
    ) -> Result<StageEvaluation, FilterError> {
        let c = &criteria.activity;
        if c.recent_activity_days <= 0 || c.min_push_activity_days <= 0 {
            return Err(FilterError::InvalidCriteria {
                stage: self.id(),
                reason: "activity windows must be positive".to_string(),
            });
        }

        let days_since_update = days_since(candidate.updated_at, self.reference_time);
        let days_since_push = days_since(candidate.pushed_at, self.reference_time);

        let mut checks_failed = Vec::new();
        if days_since_update > c.recent_activity_days {
            checks_failed.push("recent_activity".to_string());
        }
        if days_since_push > c.min_push_activity_days {
            checks_failed.push("push_activity".to_string());
        }
        // min_contributors is declared but not verifiable from search
        // metadata; it stays satisfied and is surfaced as unverified.

        let push_score = recency_score(days_since_push, c.min_push_activity_days);
        let update_score = recency_score(days_since_update, c.recent_activity_days);
        let open_issue_score = volume_score(candidate.open_issues, OPEN_ISSUE_CAP);
        let score = mean(&[push_score, update_score, open_issue_score]);

        Ok(StageEvaluation {
            passed: checks_failed.is_empty(),
            score,
            details: StageDetails::Activity {
                days_since_push,
                days_since_update,
                push_score,
                update_score,
                open_issue_score,
                contributors_verified: false,
                checks_failed,
            },
        })
    }
}
