//! Adaptive tier management: shortfall analysis and rebalancing.

use tracing::{debug, warn};

use crate::policy::TierPolicy;
use crate::rebalance::{RebalancePlan, RebalanceStrategy, TierChange};
use crate::tier::TierDefinition;

/// Reason recorded when every tier met its target.
pub const NO_ADJUSTMENT_NEEDED: &str = "No adjustment needed";

/// Initial tier template: (id, display name, min stars, max stars, share
/// of the global target).
const TIER_TEMPLATE: [(&str, &str, u64, Option<u64>, f64); 5] = [
    ("elite", "Elite (20k+ stars)", 20_000, None, 0.10),
    ("high", "High (10k-20k stars)", 10_000, Some(19_999), 0.15),
    ("mid", "Mid (5k-10k stars)", 5_000, Some(9_999), 0.25),
    ("established", "Established (2.5k-5k stars)", 2_500, Some(4_999), 0.25),
    ("emerging", "Emerging (1k-2.5k stars)", 1_000, Some(2_499), 0.25),
];

/// Decides how many candidates to target per star band and how to react
/// when a band under- or over-delivers.
///
/// Rebalancing is a pure state transition: `adjust_tiers` reads a snapshot
/// and returns a new tier set plus a change log, so concurrent
/// orchestration needs no locking beyond cloning the input. The manager
/// never errors; anomalies surface as warnings and boolean verdicts.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveTierManager {
    policy: TierPolicy,
}

impl AdaptiveTierManager {
    pub fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Fixed starter set: non-overlapping star bands whose targets sum to
    /// the global target. Pure function of the policy.
    pub fn initial_tiers(&self) -> Vec<TierDefinition> {
        TIER_TEMPLATE
            .iter()
            .map(|(id, name, min, max, share)| {
                let target = (self.policy.global_target as f64 * share).round() as u64;
                TierDefinition::new(*id, *name, *min, *max, target)
            })
            .collect()
    }

    /// Compute a rebalance plan from the last round's observations.
    ///
    /// Strategy selection, evaluated in order:
    /// 1. Topmost shortfall above the threshold: widen the rarest band by
    ///    lowering its star floor (reduce-threshold).
    /// 2. Total shortfall within the compensation ceiling: spread it over
    ///    the lowest tiers (compensate-lower).
    /// 3. Otherwise both, reduction first (mixed).
    ///
    /// Zero total shortfall yields a no-op plan with the literal
    /// "No adjustment needed" reason.
    pub fn adjust_tiers(&self, tiers: &[TierDefinition]) -> RebalancePlan {
        let original = tiers.to_vec();
        let total_target: u64 = original.iter().map(|t| t.target_count).sum();
        let total_observed: u64 = original.iter().map(|t| t.observed_count).sum();
        let total_shortfall: u64 = original.iter().map(|t| t.shortfall()).sum();

        if total_shortfall == 0 {
            debug!("all tiers at target; no rebalance");
            return RebalancePlan {
                adjusted: original.clone(),
                original,
                strategy: RebalanceStrategy::NoAdjustment,
                reason: NO_ADJUSTMENT_NEEDED.to_string(),
                changes: Vec::new(),
                total_target,
                total_observed,
            };
        }

        let mut adjusted = original.clone();
        let mut changes = Vec::new();
        let top_shortfall = topmost_index(&adjusted)
            .map(|i| adjusted[i].shortfall())
            .unwrap_or(0);

        let (strategy, reason) = if top_shortfall > self.policy.top_shortfall_threshold {
            let reason = self.apply_reduce_threshold(&mut adjusted, &mut changes);
            (RebalanceStrategy::ReduceThreshold, reason)
        } else if total_shortfall <= self.policy.compensation_ceiling {
            let reason = self.apply_compensate_lower(&mut adjusted, &mut changes);
            (RebalanceStrategy::CompensateLower, reason)
        } else {
            let first = self.apply_reduce_threshold(&mut adjusted, &mut changes);
            let second = self.apply_compensate_lower(&mut adjusted, &mut changes);
            (RebalanceStrategy::Mixed, format!("{first}; {second}"))
        };

        debug!(?strategy, total_shortfall, "rebalance plan computed");
        let plan = RebalancePlan {
            original,
            adjusted,
            strategy,
            reason,
            changes,
            total_target,
            total_observed,
        };
        // Soft invariant: checked, never enforced by failing the plan.
        if !self.validate_quality_standards(&plan.adjusted) {
            warn!(strategy = ?plan.strategy, "rebalanced tier set fails quality standards");
        }
        plan
    }

    /// Lower the topmost tier's star floor by one step and pull the
    /// adjacent tier's ceiling down to keep the bands non-overlapping.
    fn apply_reduce_threshold(
        &self,
        tiers: &mut [TierDefinition],
        changes: &mut Vec<TierChange>,
    ) -> String {
        let Some(top) = topmost_index(tiers) else {
            return "no tiers to adjust".to_string();
        };
        let adjacent = adjacent_index(tiers, top);

        let old_min = tiers[top].min_stars;
        let mut new_min = old_min.saturating_sub(self.policy.star_step);
        if let Some(adj) = adjacent {
            // Never collapse into the band below.
            new_min = new_min.max(tiers[adj].min_stars + 1);
        }
        tiers[top].min_stars = new_min;
        tiers[top].refresh_predicate();
        changes.push(TierChange {
            tier_id: tiers[top].id.clone(),
            description: format!("min_stars {old_min} -> {new_min}"),
        });

        if let Some(adj) = adjacent {
            let new_max = new_min - 1;
            tiers[adj].max_stars = Some(new_max);
            tiers[adj].refresh_predicate();
            changes.push(TierChange {
                tier_id: tiers[adj].id.clone(),
                description: format!("max_stars -> {new_max}"),
            });
        }

        format!(
            "Lowered {} threshold from {old_min} to {new_min} stars",
            tiers[top].display_name
        )
    }

    /// Spread the total shortfall over the lowest tiers by ceiling
    /// division, raising their targets.
    fn apply_compensate_lower(
        &self,
        tiers: &mut [TierDefinition],
        changes: &mut Vec<TierChange>,
    ) -> String {
        let total_shortfall: u64 = tiers.iter().map(|t| t.shortfall()).sum();
        if total_shortfall == 0 || tiers.is_empty() {
            return "no shortfall to compensate".to_string();
        }

        let mut order: Vec<usize> = (0..tiers.len()).collect();
        order.sort_by_key(|&i| tiers[i].min_stars);
        let recipients = &order[..self.policy.compensation_tiers.clamp(1, order.len())];
        let per_tier = total_shortfall.div_ceil(recipients.len() as u64);

        let mut names = Vec::new();
        for &i in recipients {
            tiers[i].target_count += per_tier;
            changes.push(TierChange {
                tier_id: tiers[i].id.clone(),
                description: format!("target_count +{per_tier}"),
            });
            names.push(tiers[i].display_name.clone());
        }

        format!(
            "Added {per_tier} to targets of {} to cover shortfall of {total_shortfall}",
            names.join(", ")
        )
    }

    /// Verify the tier set still meets collection quality standards.
    ///
    /// Returns false (with a warning, never a panic) when the lowest
    /// tier's star floor has slipped below the quality floor, or the
    /// target sum has fallen below the healthy fraction of the global
    /// target.
    pub fn validate_quality_standards(&self, tiers: &[TierDefinition]) -> bool {
        let Some(lowest) = tiers.iter().min_by_key(|t| t.min_stars) else {
            warn!("tier set is empty");
            return false;
        };
        if lowest.min_stars < self.policy.quality_floor {
            warn!(
                tier = %lowest.id,
                min_stars = lowest.min_stars,
                floor = self.policy.quality_floor,
                "lowest tier below quality floor"
            );
            return false;
        }

        let target_sum: u64 = tiers.iter().map(|t| t.target_count).sum();
        let required = self.policy.global_target as f64 * self.policy.min_target_fraction;
        if (target_sum as f64) < required {
            warn!(
                target_sum,
                required, "tier targets below healthy fraction of global target"
            );
            return false;
        }
        true
    }

    /// Static planning heuristic for how many candidates a band can yield;
    /// tighter caps for rarer bands. Not a live measurement.
    pub fn estimate_available(&self, tier: &TierDefinition) -> u64 {
        match tier.min_stars {
            m if m >= 20_000 => 70,
            m if m >= 10_000 => 300,
            m if m >= 5_000 => 800,
            m if m >= 2_500 => 2_000,
            m if m >= 1_000 => 5_000,
            _ => 10_000,
        }
    }
}

/// Index of the highest-star tier.
fn topmost_index(tiers: &[TierDefinition]) -> Option<usize> {
    tiers
        .iter()
        .enumerate()
        .max_by_key(|(_, t)| t.min_stars)
        .map(|(i, _)| i)
}

/// Index of the tier directly below `top` by star floor.
fn adjacent_index(tiers: &[TierDefinition], top: usize) -> Option<usize> {
    tiers
        .iter()
        .enumerate()
        .filter(|(i, t)| *i != top && t.min_stars < tiers[top].min_stars)
        .max_by_key(|(_, t)| t.min_stars)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AdaptiveTierManager {
        AdaptiveTierManager::default()
    }

    /// Initial tiers with every target met except the listed shortfalls.
    fn tiers_with_shortfalls(shortfalls: &[(&str, u64)]) -> Vec<TierDefinition> {
        let mut tiers = manager().initial_tiers();
        for tier in &mut tiers {
            let short = shortfalls
                .iter()
                .find(|(id, _)| *id == tier.id)
                .map(|(_, s)| *s)
                .unwrap_or(0);
            tier.observed_count = tier.target_count - short;
        }
        tiers
    }

    #[test]
    fn test_initial_tiers_cover_global_target() {
        let m = manager();
        let tiers = m.initial_tiers();
        assert_eq!(tiers.len(), 5);
        let total: u64 = tiers.iter().map(|t| t.target_count).sum();
        assert_eq!(total, m.policy().global_target);
    }

    #[test]
    fn test_initial_tiers_non_overlapping() {
        let mut tiers = manager().initial_tiers();
        tiers.sort_by_key(|t| t.min_stars);
        for pair in tiers.windows(2) {
            let max = pair[0].max_stars.expect("lower tiers must be bounded");
            assert_eq!(max + 1, pair[1].min_stars);
        }
        assert!(tiers.last().unwrap().max_stars.is_none());
    }

    #[test]
    fn test_initial_tier_predicates_rendered() {
        let tiers = manager().initial_tiers();
        let elite = tiers.iter().find(|t| t.id == "elite").unwrap();
        assert_eq!(elite.search_predicate, "stars:>=20000");
        let mid = tiers.iter().find(|t| t.id == "mid").unwrap();
        assert_eq!(mid.search_predicate, "stars:5000..9999");
    }

    #[test]
    fn test_large_top_shortfall_reduces_threshold() {
        let m = manager();
        let tiers = tiers_with_shortfalls(&[("elite", 60)]);
        let plan = m.adjust_tiers(&tiers);

        assert_eq!(plan.strategy, RebalanceStrategy::ReduceThreshold);
        let elite = plan.adjusted.iter().find(|t| t.id == "elite").unwrap();
        assert_eq!(elite.min_stars, 15_000);
        assert_eq!(elite.search_predicate, "stars:>=15000");
        let high = plan.adjusted.iter().find(|t| t.id == "high").unwrap();
        assert_eq!(high.max_stars, Some(14_999));
        assert_eq!(high.search_predicate, "stars:10000..14999");
        assert!(plan.reason.contains("20000"));
        assert!(plan.reason.contains("15000"));

        // Audit snapshot is the pre-adjustment state.
        let before = plan.original.iter().find(|t| t.id == "elite").unwrap();
        assert_eq!(before.min_stars, 20_000);
        assert_eq!(plan.original, tiers);
    }

    #[test]
    fn test_moderate_shortfall_compensates_lower_tiers() {
        let m = manager();
        let tiers = tiers_with_shortfalls(&[("elite", 20), ("mid", 60)]);
        let plan = m.adjust_tiers(&tiers);

        assert_eq!(plan.strategy, RebalanceStrategy::CompensateLower);
        let increase: u64 = plan
            .adjusted
            .iter()
            .zip(plan.original.iter())
            .map(|(a, o)| a.target_count - o.target_count)
            .sum();
        // Ceiling distribution over 2 tiers: exact or within k-1 of the
        // 80-candidate shortfall.
        assert!(increase >= 80 && increase <= 81);

        // Star thresholds untouched.
        for (a, o) in plan.adjusted.iter().zip(plan.original.iter()) {
            assert_eq!(a.min_stars, o.min_stars);
        }
        // The two lowest tiers absorbed the deficit.
        let emerging = plan.adjusted.iter().find(|t| t.id == "emerging").unwrap();
        let established = plan
            .adjusted
            .iter()
            .find(|t| t.id == "established")
            .unwrap();
        assert_eq!(emerging.target_count, 250 + 40);
        assert_eq!(established.target_count, 250 + 40);
        assert!(plan.reason.contains("80"));
    }

    #[test]
    fn test_heavy_shortfall_selects_mixed() {
        let m = manager();
        // Topmost shortfall at (not above) the threshold, total above the
        // compensation ceiling.
        let tiers = tiers_with_shortfalls(&[("elite", 50), ("high", 100)]);
        let plan = m.adjust_tiers(&tiers);

        assert_eq!(plan.strategy, RebalanceStrategy::Mixed);
        let elite = plan.adjusted.iter().find(|t| t.id == "elite").unwrap();
        assert_eq!(elite.min_stars, 15_000);
        let increase: u64 = plan
            .adjusted
            .iter()
            .zip(plan.original.iter())
            .map(|(a, o)| a.target_count - o.target_count)
            .sum();
        assert!(increase >= 150);
        assert!(plan.reason.contains(';'));
    }

    #[test]
    fn test_no_shortfall_is_noop() {
        let m = manager();
        let tiers = tiers_with_shortfalls(&[]);
        let plan = m.adjust_tiers(&tiers);

        assert!(plan.is_noop());
        assert_eq!(plan.reason, NO_ADJUSTMENT_NEEDED);
        assert_eq!(plan.adjusted, plan.original);
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn test_over_delivery_counts_as_no_shortfall() {
        let m = manager();
        let mut tiers = m.initial_tiers();
        for tier in &mut tiers {
            tier.observed_count = tier.target_count + 10;
        }
        let plan = m.adjust_tiers(&tiers);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_validate_rejects_floor_violation() {
        let m = manager();
        let mut tiers = m.initial_tiers();
        let lowest = tiers
            .iter_mut()
            .min_by_key(|t| t.min_stars)
            .unwrap();
        lowest.min_stars = 400;

        // Target sums are healthy; the floor violation alone fails it.
        assert!(!m.validate_quality_standards(&tiers));
    }

    #[test]
    fn test_validate_rejects_eroded_targets() {
        let m = manager();
        let mut tiers = m.initial_tiers();
        for tier in &mut tiers {
            tier.target_count = tier.target_count * 8 / 10;
        }
        assert!(!m.validate_quality_standards(&tiers));
    }

    #[test]
    fn test_validate_accepts_initial_tiers() {
        let m = manager();
        assert!(m.validate_quality_standards(&m.initial_tiers()));
        assert!(!m.validate_quality_standards(&[]));
    }

    #[test]
    fn test_estimates_tighten_with_star_floor() {
        let m = manager();
        let tiers = m.initial_tiers();
        // Template order runs from highest star floor to lowest, so the
        // caps must already be ascending: higher floor, tighter cap.
        let caps: Vec<u64> = tiers.iter().map(|t| m.estimate_available(t)).collect();
        let mut sorted = caps.clone();
        sorted.sort();
        assert_eq!(caps, sorted);
        let elite = tiers.iter().find(|t| t.id == "elite").unwrap();
        assert_eq!(m.estimate_available(elite), 70);
    }

    #[test]
    fn test_adjust_never_mutates_input() {
        let m = manager();
        let tiers = tiers_with_shortfalls(&[("elite", 60)]);
        let snapshot = tiers.clone();
        let _ = m.adjust_tiers(&tiers);
        assert_eq!(tiers, snapshot);
    }
}
