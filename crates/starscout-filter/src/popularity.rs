//! Popularity stage: star/fork thresholds and lifecycle flags.

use async_trait::async_trait;

use starscout_core::score::{mean, ratio_score};
use starscout_core::{Candidate, FilterCriteria, StageDetails, StageId};

use crate::error::FilterError;
use crate::stage::{FilterStage, StageEvaluation};

/// First gate: popularity thresholds and lifecycle flags.
///
/// Passes iff stars and forks meet their minimums (inclusive) and the
/// repository is neither archived nor disabled, where those flags are
/// required by criteria. Unknown counts are treated as zero and fail
/// their check.
pub struct PopularityStage;

#[async_trait]
impl FilterStage for PopularityStage {
    fn id(&self) -> StageId {
        StageId::Popularity
    }

    async fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &FilterCriteria,
    ) -> Result<StageEvaluation, FilterError> {
        let c = &criteria.popularity;
        let stars = candidate.stars.unwrap_or(0);
        let forks = candidate.forks.unwrap_or(0);

        let mut checks_failed = Vec::new();
        if stars < c.min_stars {
            checks_failed.push("min_stars".to_string());
        }
        if forks < c.min_forks {
            checks_failed.push("min_forks".to_string());
        }
        if c.require_not_archived && candidate.archived {
            checks_failed.push("not_archived".to_string());
        }
        if c.require_not_disabled && candidate.disabled {
            checks_failed.push("not_disabled".to_string());
        }

        let star_score = ratio_score(stars, c.min_stars);
        let fork_score = ratio_score(forks, c.min_forks);
        let archived_score = if candidate.archived { 0.0 } else { 1.0 };
        let disabled_score = if candidate.disabled { 0.0 } else { 1.0 };
        let score = mean(&[star_score, fork_score, archived_score, disabled_score]);

        Ok(StageEvaluation {
            passed: checks_failed.is_empty(),
            score,
            details: StageDetails::Popularity {
                stars,
                forks,
                star_score,
                fork_score,
                archived: candidate.archived,
                disabled: candidate.disabled,
                checks_failed,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(stars: u64, forks: u64) -> Candidate {
        let mut c = Candidate::named("acme/widget");
        c.stars = Some(stars);
        c.forks = Some(forks);
        c
    }

    #[tokio::test]
    async fn test_passes_at_inclusive_boundary() {
        let criteria = FilterCriteria::default();
        let c = candidate(
            criteria.popularity.min_stars,
            criteria.popularity.min_forks,
        );

        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(eval.passed);
    }

    #[tokio::test]
    async fn test_fails_below_star_minimum_regardless_of_forks() {
        let criteria = FilterCriteria::default();
        let c = candidate(criteria.popularity.min_stars - 1, 1_000_000);

        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(!eval.passed);
        match eval.details {
            StageDetails::Popularity {
                star_score,
                ref checks_failed,
                ..
            } => {
                assert_eq!(star_score, 0.0);
                assert!(checks_failed.contains(&"min_stars".to_string()));
            }
            ref other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_score_monotonic_in_stars_and_saturates() {
        let criteria = FilterCriteria::default();
        let min = criteria.popularity.min_stars;

        let mut last = 0.0;
        for stars in [min, 2 * min, 5 * min, 10 * min, 100 * min] {
            let eval = PopularityStage
                .evaluate(&candidate(stars, criteria.popularity.min_forks), &criteria)
                .await
                .unwrap();
            assert!(eval.score >= last);
            last = eval.score;
        }

        let at_ceiling = PopularityStage
            .evaluate(
                &candidate(10 * min, criteria.popularity.min_forks),
                &criteria,
            )
            .await
            .unwrap();
        let beyond = PopularityStage
            .evaluate(
                &candidate(100 * min, criteria.popularity.min_forks),
                &criteria,
            )
            .await
            .unwrap();
        assert_eq!(at_ceiling.score, beyond.score);
    }

    #[tokio::test]
    async fn test_unknown_counts_fail_their_checks() {
        let criteria = FilterCriteria::default();
        let c = Candidate::named("acme/widget");

        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(!eval.passed);
        match eval.details {
            StageDetails::Popularity {
                stars,
                forks,
                ref checks_failed,
                ..
            } => {
                assert_eq!((stars, forks), (0, 0));
                assert!(checks_failed.contains(&"min_stars".to_string()));
                assert!(checks_failed.contains(&"min_forks".to_string()));
            }
            ref other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_archived_gates_only_when_required() {
        let mut criteria = FilterCriteria::default();
        let mut c = candidate(50_000, 5_000);
        c.archived = true;

        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(!eval.passed);

        criteria.popularity.require_not_archived = false;
        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(eval.passed);
        // The archived sub-score still drags the mean down.
        assert!(eval.score < 1.0);
    }

    #[tokio::test]
    async fn test_score_independent_of_pass() {
        // A failing candidate still carries a nonzero diagnostic score.
        let criteria = FilterCriteria::default();
        let c = candidate(criteria.popularity.min_stars * 20, 0);

        let eval = PopularityStage.evaluate(&c, &criteria).await.unwrap();
        assert!(!eval.passed);
        assert!(eval.score > 0.0);
    }
}
