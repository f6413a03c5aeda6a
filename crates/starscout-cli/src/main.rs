//! StarScout CLI - candidate filtering and tier planning
//!
//! The `starscout` command drives collection rounds from the terminal.
//!
//! ## Commands
//!
//! - `filter`: run candidate records from a JSON file through the pipeline
//! - `tiers init`: print the initial tier set as JSON
//! - `tiers plan`: compute a rebalance plan from an observed tier set
//! - `tiers validate`: check a tier set against quality standards
//! - `estimate`: print per-tier availability estimates

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use starscout_core::{Candidate, FilterCriteria, QualityAssessment};
use starscout_filter::FilterPipeline;
use starscout_store::fakes::{MemoryAssessmentSource, MemoryOutcomeSink};
use starscout_store::OutcomeSink;
use starscout_tiers::{AdaptiveTierManager, TierDefinition, TierPolicy};

mod report;

#[derive(Parser)]
#[command(name = "starscout")]
#[command(author = "StarScout Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive open-source repository collection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run candidate records through the filtering pipeline
    Filter {
        /// Path to candidate records (JSON array)
        #[arg(short, long)]
        candidates: PathBuf,

        /// Criteria file (JSON); overrides --preset
        #[arg(long)]
        criteria: Option<PathBuf>,

        /// Criteria preset used when no criteria file is given
        #[arg(long, value_parser = ["default", "strict", "lenient"], default_value = "default")]
        preset: String,

        /// Precomputed assessments (JSON array) for final selection
        #[arg(long)]
        assessments: Option<PathBuf>,

        /// Write the full outcome ledger to this file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage collection tiers
    Tiers {
        #[command(subcommand)]
        action: TiersAction,
    },

    /// Print per-tier availability estimates
    Estimate {
        /// Tier set (JSON array)
        #[arg(short, long)]
        tiers: PathBuf,

        /// Tier policy file (JSON); defaults to the standard policy
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TiersAction {
    /// Print the initial tier set as JSON
    Init {
        /// Tier policy file (JSON); defaults to the standard policy
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Compute a rebalance plan from an observed tier set
    Plan {
        /// Tier set with observed counts (JSON array)
        #[arg(short, long)]
        tiers: PathBuf,

        #[arg(long)]
        policy: Option<PathBuf>,

        /// Print the full plan as JSON instead of a summary
        #[arg(long)]
        json_output: bool,
    },

    /// Check a tier set against quality standards
    Validate {
        /// Tier set (JSON array)
        #[arg(short, long)]
        tiers: PathBuf,

        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_policy(path: Option<&PathBuf>) -> Result<TierPolicy> {
    match path {
        Some(p) => load_json(p),
        None => Ok(TierPolicy::default()),
    }
}

fn load_criteria(path: Option<&PathBuf>, preset: &str) -> Result<FilterCriteria> {
    if let Some(p) = path {
        return load_json(p);
    }
    Ok(match preset {
        "strict" => FilterCriteria::strict(),
        "lenient" => FilterCriteria::lenient(),
        _ => FilterCriteria::default(),
    })
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    match cli.command {
        Commands::Filter {
            candidates,
            criteria,
            preset,
            assessments,
            output,
        } => cmd_filter(&candidates, criteria, &preset, assessments, output).await,
        Commands::Tiers { action } => match action {
            TiersAction::Init { policy } => cmd_tiers_init(policy),
            TiersAction::Plan {
                tiers,
                policy,
                json_output,
            } => cmd_tiers_plan(&tiers, policy, json_output),
            TiersAction::Validate { tiers, policy } => cmd_tiers_validate(&tiers, policy),
        },
        Commands::Estimate { tiers, policy } => cmd_estimate(&tiers, policy),
    }
}

async fn cmd_filter(
    candidates_path: &Path,
    criteria_path: Option<PathBuf>,
    preset: &str,
    assessments_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let candidates: Vec<Candidate> = load_json(candidates_path)?;
    let criteria = load_criteria(criteria_path.as_ref(), preset)?;
    let assessments: Vec<QualityAssessment> = match assessments_path.as_ref() {
        Some(p) => load_json(p)?,
        None => Vec::new(),
    };
    info!(
        candidates = candidates.len(),
        assessments = assessments.len(),
        "loaded filter inputs"
    );

    let sink = Arc::new(MemoryOutcomeSink::new());
    let source = Arc::new(MemoryAssessmentSource::ranked(assessments));
    let pipeline = FilterPipeline::new(criteria, sink.clone(), source);

    let result = pipeline
        .run_batch(
            &candidates,
            json!({ "source": candidates_path.display().to_string() }),
        )
        .await
        .context("filter batch failed")?;

    print!("{}", report::render_batch(&result));

    if let Some(path) = output {
        let record = sink.get_batch(&result.batch_id).await?;
        let ledger = json!({
            "batch": record,
            "outcomes": result.outcomes,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&ledger)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "outcome ledger written");
    }
    Ok(())
}

fn cmd_tiers_init(policy: Option<PathBuf>) -> Result<()> {
    let manager = AdaptiveTierManager::new(load_policy(policy.as_ref())?);
    let tiers = manager.initial_tiers();
    println!("{}", serde_json::to_string_pretty(&tiers)?);
    Ok(())
}

fn cmd_tiers_plan(tiers_path: &Path, policy: Option<PathBuf>, json_output: bool) -> Result<()> {
    let tiers: Vec<TierDefinition> = load_json(tiers_path)?;
    let manager = AdaptiveTierManager::new(load_policy(policy.as_ref())?);
    let plan = manager.adjust_tiers(&tiers);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", report::render_plan(&plan));
    }
    Ok(())
}

fn cmd_tiers_validate(tiers_path: &Path, policy: Option<PathBuf>) -> Result<()> {
    let tiers: Vec<TierDefinition> = load_json(tiers_path)?;
    let manager = AdaptiveTierManager::new(load_policy(policy.as_ref())?);
    if manager.validate_quality_standards(&tiers) {
        println!("tier set meets quality standards");
        Ok(())
    } else {
        anyhow::bail!("tier set fails quality standards");
    }
}

fn cmd_estimate(tiers_path: &Path, policy: Option<PathBuf>) -> Result<()> {
    let tiers: Vec<TierDefinition> = load_json(tiers_path)?;
    let manager = AdaptiveTierManager::new(load_policy(policy.as_ref())?);
    print!("{}", report::render_estimates(&manager, &tiers));
    Ok(())
}
