//! Quality stage: license, description, and repository metadata richness.

use async_trait::async_trait;

use starscout_core::score::{mean, volume_score};
use starscout_core::{Candidate, FilterCriteria, StageDetails, StageId};

use crate::error::FilterError;
use crate::stage::{FilterStage, StageEvaluation};

/// Topic count at which the topic sub-score saturates.
const TOPIC_CAP: u64 = 5;

/// Third gate: license presence and descriptive metadata.
///
/// Only the license check gates pass/fail; description, homepage, topics,
/// and feature flags shape the score. README existence and quality are
/// advisory placeholders until file contents are fetched - the criteria
/// value is carried into details verbatim, marked unverified, and kept out
/// of the score mean.
pub struct QualityStage;

#[async_trait]
impl FilterStage for QualityStage {
    fn id(&self) -> StageId {
        StageId::Quality
    }

    async fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &FilterCriteria,
    ) -> Result<StageEvaluation, FilterError> {
        let c = &criteria.quality;

        let has_license = candidate.license.is_some();
        let mut checks_failed = Vec::new();
        if c.require_license && !has_license {
            checks_failed.push("license".to_string());
        }

        let description_ok = candidate
            .description
            .as_deref()
            .map(|d| d.len() > c.min_description_len)
            .unwrap_or(false);
        let homepage_present = candidate
            .homepage
            .as_deref()
            .map(|h| !h.is_empty())
            .unwrap_or(false);

        let license_score = if has_license { 1.0 } else { 0.0 };
        let description_score = if description_ok { 1.0 } else { 0.0 };
        let homepage_score = if homepage_present { 0.5 } else { 0.0 };
        let topic_score = volume_score(candidate.topic_count, TOPIC_CAP);
        let feature_score = (if candidate.has_issues { 1.0 } else { 0.0 }
            + if candidate.has_projects { 0.5 } else { 0.0 }
            + if candidate.has_wiki { 0.5 } else { 0.0 })
            / 2.0;

        let score = mean(&[
            license_score,
            description_score,
            homepage_score,
            topic_score,
            feature_score,
        ]);

        Ok(StageEvaluation {
            passed: checks_failed.is_empty(),
            score,
            details: StageDetails::Quality {
                license: candidate.license.clone(),
                description_ok,
                homepage_present,
                topic_score,
                feature_score,
                readme_score: c.readme_quality.value,
                readme_verified: false,
                checks_failed,
            },
        })
    }
}
