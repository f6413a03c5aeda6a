//! Rebalance plans: the audit record of a tier adjustment.

use serde::{Deserialize, Serialize};

use crate::tier::TierDefinition;

/// Strategy the manager selected for a rebalance round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceStrategy {
    /// Lower the topmost tier's star threshold to widen the rarest band.
    ReduceThreshold,

    /// Raise lower-tier targets to absorb the deficit.
    CompensateLower,

    /// Threshold reduction followed by compensation.
    Mixed,

    /// Every tier met its target; nothing to do.
    NoAdjustment,
}

/// One recorded mutation within a rebalance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChange {
    pub tier_id: String,
    pub description: String,
}

/// Result of one rebalance round.
///
/// `original` is the untouched pre-adjustment snapshot for audit;
/// `adjusted` is the tier set the next collection round should use. The
/// plan does not persist - the orchestrator consumes it immediately to
/// issue follow-up queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub original: Vec<TierDefinition>,
    pub adjusted: Vec<TierDefinition>,
    pub strategy: RebalanceStrategy,

    /// Human-readable justification for the selected strategy.
    pub reason: String,

    pub changes: Vec<TierChange>,
    pub total_target: u64,
    pub total_observed: u64,
}

impl RebalancePlan {
    /// Whether the plan leaves the tier set untouched.
    pub fn is_noop(&self) -> bool {
        self.strategy == RebalanceStrategy::NoAdjustment
    }
}
