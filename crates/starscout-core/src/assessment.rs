//! Aggregate quality assessments consumed by the final selection stage.
//!
//! Assessments are produced out-of-band by a ranking pass over the full
//! candidate set and keyed by candidate identity. The selection stage only
//! reads them; absence of an assessment is an ordinary (failing) condition,
//! never a fault.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;

/// Precomputed aggregate assessment for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub candidate_id: CandidateId,

    /// Overall score in [0, 1]; the selection stage reports it verbatim.
    pub overall_score: f64,

    pub popularity_score: f64,
    pub activity_score: f64,
    pub quality_score: f64,
    pub community_score: f64,

    /// 1-based rank within the assessed set (1 = best).
    pub rank: usize,
}

impl QualityAssessment {
    /// Diagnostic percentile rank: round(((total - rank + 1) / total) * 100).
    pub fn percentile_rank(&self, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        let fraction = (total - self.rank + 1) as f64 / total as f64;
        (fraction * 100.0).round() as u32
    }
}

/// Rank cutoff for a top-percentile selection: ceil(total * pct / 100).
pub fn rank_cutoff(total: usize, top_percentile: f64) -> usize {
    (total as f64 * top_percentile / 100.0).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(rank: usize) -> QualityAssessment {
        QualityAssessment {
            candidate_id: CandidateId::new("acme/widget"),
            overall_score: 0.8,
            popularity_score: 0.9,
            activity_score: 0.7,
            quality_score: 0.8,
            community_score: 0.6,
            rank,
        }
    }

    #[test]
    fn test_percentile_rank_top_and_bottom() {
        assert_eq!(assessment(1).percentile_rank(200), 100);
        assert_eq!(assessment(200).percentile_rank(200), 1);
    }

    #[test]
    fn test_percentile_rank_empty_set() {
        assert_eq!(assessment(1).percentile_rank(0), 0);
    }

    #[test]
    fn test_rank_cutoff_rounds_up() {
        assert_eq!(rank_cutoff(200, 25.0), 50);
        assert_eq!(rank_cutoff(201, 25.0), 51);
        assert_eq!(rank_cutoff(10, 33.0), 4);
        assert_eq!(rank_cutoff(0, 25.0), 0);
    }
}
