//! Shared scoring and recency helpers.
//!
//! Every sub-score in the pipeline is normalized to [0, 1] before being
//! averaged, so stage scores are comparable across stages and candidates.

use chrono::{DateTime, Utc};

/// Clamp a value into [0, 1].
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Sub-score for a count against a minimum threshold, normalized between
/// `min` and `10 * min`: 0.0 at or below the threshold, saturating at 1.0
/// from ten times the threshold upward.
///
/// A zero threshold means the check is trivially met; the sub-score is 1.0.
pub fn ratio_score(value: u64, min: u64) -> f64 {
    if min == 0 {
        return 1.0;
    }
    clamp01((value as f64 - min as f64) / (9.0 * min as f64))
}

/// Recency sub-score: 1.0 for "just now", linearly down to 0.0 at or
/// beyond the window.
pub fn recency_score(days: i64, window_days: i64) -> f64 {
    if window_days <= 0 {
        return 0.0;
    }
    clamp01((window_days as f64 - days as f64) / window_days as f64)
}

/// Volume sub-score: count capped at `cap`, scaled into [0, 1].
pub fn volume_score(count: u64, cap: u64) -> f64 {
    if cap == 0 {
        return 0.0;
    }
    clamp01(count as f64 / cap as f64)
}

/// Arithmetic mean of sub-scores; 0.0 for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Whole days elapsed since `ts`, floored at zero for future timestamps.
///
/// A missing timestamp yields `i64::MAX`, guaranteeing any recency check
/// fails without becoming an error.
pub fn days_since(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match ts {
        Some(t) => (now - t).num_days().max(0),
        None => i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ratio_score_boundaries() {
        // At the threshold: 0. At ten times the threshold: saturates at 1.
        assert_eq!(ratio_score(1000, 1000), 0.0);
        assert_eq!(ratio_score(10_000, 1000), 1.0);
        assert_eq!(ratio_score(50_000, 1000), 1.0);
        assert_eq!(ratio_score(0, 1000), 0.0);
    }

    #[test]
    fn test_ratio_score_midpoint() {
        // Halfway between min and 10*min.
        let score = ratio_score(5500, 1000);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_score_monotonic() {
        let mut last = 0.0;
        for stars in (1000..=10_000).step_by(500) {
            let score = ratio_score(stars, 1000);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_ratio_score_zero_threshold() {
        assert_eq!(ratio_score(0, 0), 1.0);
    }

    #[test]
    fn test_recency_score() {
        assert_eq!(recency_score(0, 180), 1.0);
        assert_eq!(recency_score(90, 180), 0.5);
        assert_eq!(recency_score(180, 180), 0.0);
        assert_eq!(recency_score(400, 180), 0.0);
        assert_eq!(recency_score(i64::MAX, 180), 0.0);
    }

    #[test]
    fn test_volume_score_caps() {
        assert_eq!(volume_score(25, 50), 0.5);
        assert_eq!(volume_score(80, 50), 1.0);
        assert_eq!(volume_score(0, 50), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 0.0, 0.5, 0.5]), 0.5);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_days_since_missing_timestamp() {
        assert_eq!(days_since(None, Utc::now()), i64::MAX);
    }

    #[test]
    fn test_days_since_future_timestamp_floors_at_zero() {
        let now = Utc::now();
        assert_eq!(days_since(Some(now + Duration::days(3)), now), 0);
    }

    #[test]
    fn test_days_since_past() {
        let now = Utc::now();
        assert_eq!(days_since(Some(now - Duration::days(42)), now), 42);
    }
}
