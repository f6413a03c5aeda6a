//! Plain-text rendering of batch results and rebalance plans.

use starscout_core::{StageId, StageStatus};
use starscout_filter::BatchOutcome;
use starscout_tiers::{AdaptiveTierManager, RebalancePlan, TierDefinition};

fn status_cell(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Passed => "pass",
        StageStatus::Failed => "FAIL",
        StageStatus::Skipped => "skip",
    }
}

/// One line per candidate with per-stage statuses, plus a summary footer.
pub fn render_batch(result: &BatchOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("batch {}\n", result.batch_id));
    out.push_str(&format!(
        "{:<40} {:>11} {:>9} {:>8} {:>10}\n",
        "candidate", "popularity", "activity", "quality", "selection"
    ));

    for ledger in &result.outcomes {
        let mut cells = Vec::new();
        for stage in StageId::ORDERED {
            let cell = ledger
                .outcomes
                .iter()
                .find(|o| o.stage == stage)
                .map(|o| status_cell(o.status))
                .unwrap_or("-");
            cells.push(cell);
        }
        out.push_str(&format!(
            "{:<40} {:>11} {:>9} {:>8} {:>10}\n",
            ledger.candidate_id.to_string(),
            cells[0],
            cells[1],
            cells[2],
            cells[3]
        ));
    }

    out.push_str(&format!(
        "\n{} candidates: {} passed, {} failed, {} errored ({} ms)\n",
        result.summary.candidates,
        result.summary.passed,
        result.summary.failed,
        result.summary.errored,
        result.summary.duration_ms
    ));
    out
}

/// Strategy, justification, and per-tier changes of a rebalance plan.
pub fn render_plan(plan: &RebalancePlan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "strategy: {:?}\nreason:   {}\n",
        plan.strategy, plan.reason
    ));
    out.push_str(&format!(
        "targets:  {} -> {} (observed {})\n",
        plan.total_target,
        plan.adjusted.iter().map(|t| t.target_count).sum::<u64>(),
        plan.total_observed
    ));
    if !plan.changes.is_empty() {
        out.push_str("changes:\n");
        for change in &plan.changes {
            out.push_str(&format!("  {:<14} {}\n", change.tier_id, change.description));
        }
    }
    out
}

/// Per-tier availability estimates against current targets.
pub fn render_estimates(manager: &AdaptiveTierManager, tiers: &[TierDefinition]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:<20} {:>8} {:>10}\n",
        "tier", "predicate", "target", "available"
    ));
    for tier in tiers {
        out.push_str(&format!(
            "{:<14} {:<20} {:>8} {:>10}\n",
            tier.id,
            tier.search_predicate,
            tier.target_count,
            manager.estimate_available(tier)
        ));
    }
    out
}
