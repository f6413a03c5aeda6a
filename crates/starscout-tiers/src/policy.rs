//! Rebalancing policy knobs.

use serde::{Deserialize, Serialize};

/// Configuration for tier construction and rebalancing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Global collection target across all tiers.
    pub global_target: u64,

    /// Lowest admissible `min_stars` for the bottom tier. Rebalancing must
    /// never push collection quality below this floor.
    pub quality_floor: u64,

    /// Topmost-tier shortfall beyond which its star threshold is reduced.
    pub top_shortfall_threshold: u64,

    /// Total shortfall at or below which lower tiers absorb the whole
    /// deficit; beyond it, threshold reduction and compensation combine.
    pub compensation_ceiling: u64,

    /// Stars removed from the topmost threshold per reduction.
    pub star_step: u64,

    /// Number of lowest tiers that absorb compensation increases.
    pub compensation_tiers: usize,

    /// Minimum healthy fraction of the global target after a rebalance.
    pub min_target_fraction: f64,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            global_target: 1000,
            quality_floor: 500,
            top_shortfall_threshold: 50,
            compensation_ceiling: 100,
            star_step: 5000,
            compensation_tiers: 2,
            min_target_fraction: 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_json_round_trip() {
        let policy = TierPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let back: TierPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.global_target, policy.global_target);
        assert_eq!(back.star_step, policy.star_step);
    }
}
