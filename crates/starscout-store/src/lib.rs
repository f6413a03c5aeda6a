//! StarScout Store - storage contracts for collection batches
//!
//! This crate defines the persistence seams of the system:
//! - `CandidateSource`: supplies finite, ordered candidate sequences per query
//! - `OutcomeSink`: durable, append-only batch ledger of per-stage outcomes
//! - `AssessmentSource`: precomputed aggregate assessments for final selection
//!
//! All traits are async and backend-agnostic. The network search client and
//! the durable database behind these traits are external collaborators;
//! in-memory fakes are provided for testing via the `fakes` module.

mod error;
pub mod fakes;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use traits::{
    AssessmentSource, BatchId, BatchMetadata, BatchRecord, BatchStatus, BatchSummary,
    CandidateSource, OutcomeSink, RecordedOutcome,
};
