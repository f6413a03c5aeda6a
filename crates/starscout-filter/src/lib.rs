//! StarScout Filter - multi-stage candidate evaluation
//!
//! Provides the filtering pipeline that:
//! - Evaluates candidates through four ordered quality gates
//!   (popularity, activity, quality, final selection)
//! - Records every stage outcome in a batch ledger, skipped stages included
//! - Isolates failures per candidate so one fault never aborts a batch

pub mod activity;
pub mod error;
pub mod pipeline;
pub mod popularity;
pub mod quality;
pub mod selection;
pub mod stage;

// Re-export key types
pub use activity::ActivityStage;
pub use error::FilterError;
pub use pipeline::{BatchOutcome, FilterPipeline};
pub use popularity::PopularityStage;
pub use quality::QualityStage;
pub use selection::SelectionStage;
pub use stage::{FilterStage, StageEvaluation};
