//! Final selection stage: aggregate score and percentile rank.

use std::sync::Arc;

use async_trait::async_trait;

use starscout_core::assessment::rank_cutoff;
use starscout_core::{Candidate, FilterCriteria, StageDetails, StageId};
use starscout_store::AssessmentSource;

use crate::error::FilterError;
use crate::stage::{FilterStage, StageEvaluation};

/// Terminal gate: admits candidates whose precomputed aggregate assessment
/// clears the overall-score floor and lands within the top percentile of
/// the assessed set.
///
/// A candidate the ranking pass never covered fails immediately with score
/// zero and an explicit no-assessment detail - that is an ordinary
/// outcome, not a fault.
pub struct SelectionStage {
    assessments: Arc<dyn AssessmentSource>,
}

impl SelectionStage {
    pub fn new(assessments: Arc<dyn AssessmentSource>) -> Self {
        Self { assessments }
    }
}

#[async_trait]
impl FilterStage for SelectionStage {
    fn id(&self) -> StageId {
        StageId::FinalSelection
    }

    async fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &FilterCriteria,
    ) -> Result<StageEvaluation, FilterError> {
        let c = &criteria.selection;
        if c.top_percentile <= 0.0 || c.top_percentile > 100.0 {
            return Err(FilterError::InvalidCriteria {
                stage: self.id(),
                reason: format!("top_percentile {} outside (0, 100]", c.top_percentile),
            });
        }

        let Some(assessment) = self.assessments.assessment_for(&candidate.id).await? else {
            return Ok(StageEvaluation {
                passed: false,
                score: 0.0,
                details: StageDetails::NoAssessment,
            });
        };
        let total = self.assessments.total_assessed().await?;
        let cutoff = rank_cutoff(total, c.top_percentile);

        let mut checks_failed = Vec::new();
        if assessment.overall_score < c.min_overall_score {
            checks_failed.push("min_overall_score".to_string());
        }
        if assessment.rank > cutoff {
            checks_failed.push("top_percentile".to_string());
        }

        Ok(StageEvaluation {
            passed: checks_failed.is_empty(),
            // The aggregate score is reported verbatim, not re-normalized.
            score: assessment.overall_score,
            details: StageDetails::Selection {
                overall_score: assessment.overall_score,
                rank: assessment.rank,
                total_assessed: total,
                percentile_rank: assessment.percentile_rank(total),
                rank_cutoff: cutoff,
                checks_failed,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starscout_core::{CandidateId, QualityAssessment};
    use starscout_store::fakes::MemoryAssessmentSource;

    fn assessment(name: &str, overall: f64, rank: usize) -> QualityAssessment {
        QualityAssessment {
            candidate_id: CandidateId::new(name),
            overall_score: overall,
            popularity_score: 0.9,
            activity_score: 0.7,
            quality_score: 0.8,
            community_score: 0.6,
            rank,
        }
    }

    fn stage_with(assessments: Vec<QualityAssessment>) -> SelectionStage {
        SelectionStage::new(Arc::new(MemoryAssessmentSource::ranked(assessments)))
    }

    #[tokio::test]
    async fn test_missing_assessment_fails_without_error() {
        let stage = stage_with(vec![]);
        let c = Candidate::named("acme/unranked");

        let eval = stage
            .evaluate(&c, &FilterCriteria::default())
            .await
            .unwrap();
        assert!(!eval.passed);
        assert_eq!(eval.score, 0.0);
        assert_eq!(eval.details, StageDetails::NoAssessment);
    }

    #[tokio::test]
    async fn test_top_ranked_candidate_passes() {
        let mut ranked = vec![assessment("acme/widget", 0.9, 1)];
        for i in 2..=100 {
            ranked.push(assessment(&format!("acme/other{i}"), 0.5, i));
        }
        let stage = stage_with(ranked);
        let c = Candidate::named("acme/widget");

        let eval = stage
            .evaluate(&c, &FilterCriteria::default())
            .await
            .unwrap();
        assert!(eval.passed);
        assert_eq!(eval.score, 0.9);
        match eval.details {
            StageDetails::Selection {
                percentile_rank,
                rank_cutoff,
                ..
            } => {
                assert_eq!(percentile_rank, 100);
                assert_eq!(rank_cutoff, 25);
            }
            ref other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rank_outside_percentile_fails() {
        let mut ranked = Vec::new();
        for i in 1..=100 {
            ranked.push(assessment(&format!("acme/r{i}"), 0.8, i));
        }
        let stage = stage_with(ranked);
        let c = Candidate::named("acme/r60");

        let eval = stage
            .evaluate(&c, &FilterCriteria::default())
            .await
            .unwrap();
        assert!(!eval.passed);
        // Score carries the aggregate verbatim even on failure.
        assert_eq!(eval.score, 0.8);
        match eval.details {
            StageDetails::Selection {
                ref checks_failed, ..
            } => assert_eq!(checks_failed, &vec!["top_percentile".to_string()]),
            ref other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_low_overall_score_fails() {
        let stage = stage_with(vec![assessment("acme/widget", 0.3, 1)]);
        let c = Candidate::named("acme/widget");

        let eval = stage
            .evaluate(&c, &FilterCriteria::default())
            .await
            .unwrap();
        assert!(!eval.passed);
        match eval.details {
            StageDetails::Selection {
                ref checks_failed, ..
            } => assert!(checks_failed.contains(&"min_overall_score".to_string())),
            ref other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_percentile_is_contract_violation() {
        let stage = stage_with(vec![]);
        let c = Candidate::named("acme/widget");
        let mut criteria = FilterCriteria::default();
        criteria.selection.top_percentile = 0.0;

        let err = stage.evaluate(&c, &criteria).await.unwrap_err();
        assert!(matches!(err, FilterError::InvalidCriteria { .. }));
    }
}
