//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryCandidateSource`, `MemoryOutcomeSink`, and
//! `MemoryAssessmentSource` that satisfy the trait contracts without any
//! external dependencies. The sink also supports write-failure injection
//! so pipeline sink-tolerance can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use starscout_core::{Candidate, CandidateId, QualityAssessment, StageOutcome};

use crate::error::{StoreError, StoreResult};
use crate::traits::*;

// ---------------------------------------------------------------------------
// MemoryCandidateSource
// ---------------------------------------------------------------------------

/// In-memory candidate source keyed by search predicate.
#[derive(Debug, Default)]
pub struct MemoryCandidateSource {
    queries: Mutex<HashMap<String, Vec<Candidate>>>,
}

impl MemoryCandidateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the candidates returned for a predicate.
    pub fn seed(&self, predicate: impl Into<String>, candidates: Vec<Candidate>) {
        let mut queries = self.queries.lock().unwrap();
        queries.insert(predicate.into(), candidates);
    }
}

#[async_trait]
impl CandidateSource for MemoryCandidateSource {
    async fn fetch(&self, predicate: &str, limit: usize) -> StoreResult<Vec<Candidate>> {
        let queries = self.queries.lock().unwrap();
        let mut candidates = queries.get(predicate).cloned().unwrap_or_default();
        candidates.truncate(limit);
        Ok(candidates)
    }
}

// ---------------------------------------------------------------------------
// MemoryOutcomeSink
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct BatchState {
    record: BatchRecord,
    outcomes: Vec<RecordedOutcome>,
}

/// In-memory batch ledger backed by a `HashMap<BatchId, BatchState>`.
#[derive(Debug, Default)]
pub struct MemoryOutcomeSink {
    batches: Mutex<HashMap<String, BatchState>>,
    fail_writes: AtomicBool,
}

impl MemoryOutcomeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `record` call fail, for sink-tolerance tests.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OutcomeSink for MemoryOutcomeSink {
    async fn begin_batch(&self, metadata: BatchMetadata) -> StoreResult<BatchId> {
        let batch_id = BatchId::new();
        let record = BatchRecord {
            batch_id: batch_id.clone(),
            metadata,
            status: BatchStatus::Running,
            summary: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        let mut batches = self.batches.lock().unwrap();
        batches.insert(
            batch_id.0.clone(),
            BatchState {
                record,
                outcomes: Vec::new(),
            },
        );
        Ok(batch_id)
    }

    async fn record(
        &self,
        batch_id: &BatchId,
        candidate_id: &CandidateId,
        outcome: &StageOutcome,
    ) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed {
                reason: "injected write failure".to_string(),
            });
        }
        let mut batches = self.batches.lock().unwrap();
        let state = batches
            .get_mut(&batch_id.0)
            .ok_or_else(|| StoreError::BatchNotFound {
                batch_id: batch_id.0.clone(),
            })?;
        if state.record.status != BatchStatus::Running {
            return Err(StoreError::InvalidBatchState {
                batch_id: batch_id.0.clone(),
                status: format!("{:?}", state.record.status),
                expected: "Running".to_string(),
            });
        }
        state.outcomes.push(RecordedOutcome {
            candidate_id: candidate_id.clone(),
            outcome: outcome.clone(),
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    async fn complete_batch(&self, batch_id: &BatchId, summary: BatchSummary) -> StoreResult<()> {
        let mut batches = self.batches.lock().unwrap();
        let state = batches
            .get_mut(&batch_id.0)
            .ok_or_else(|| StoreError::BatchNotFound {
                batch_id: batch_id.0.clone(),
            })?;
        if state.record.status != BatchStatus::Running {
            return Err(StoreError::InvalidBatchState {
                batch_id: batch_id.0.clone(),
                status: format!("{:?}", state.record.status),
                expected: "Running".to_string(),
            });
        }
        state.record.status = BatchStatus::Completed;
        state.record.summary = Some(summary);
        state.record.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn get_batch(&self, batch_id: &BatchId) -> StoreResult<BatchRecord> {
        let batches = self.batches.lock().unwrap();
        batches
            .get(&batch_id.0)
            .map(|s| s.record.clone())
            .ok_or_else(|| StoreError::BatchNotFound {
                batch_id: batch_id.0.clone(),
            })
    }

    async fn outcomes(&self, batch_id: &BatchId) -> StoreResult<Vec<RecordedOutcome>> {
        let batches = self.batches.lock().unwrap();
        let state = batches
            .get(&batch_id.0)
            .ok_or_else(|| StoreError::BatchNotFound {
                batch_id: batch_id.0.clone(),
            })?;
        Ok(state.outcomes.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryAssessmentSource
// ---------------------------------------------------------------------------

/// In-memory assessment source backed by a `HashMap<CandidateId, QualityAssessment>`.
#[derive(Debug, Default)]
pub struct MemoryAssessmentSource {
    assessments: Mutex<HashMap<String, QualityAssessment>>,
    total: Mutex<usize>,
}

impl MemoryAssessmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a complete ranking pass; the total assessed
    /// count equals the number of assessments.
    pub fn ranked(assessments: Vec<QualityAssessment>) -> Self {
        let source = Self::new();
        let total = assessments.len();
        {
            let mut map = source.assessments.lock().unwrap();
            for assessment in assessments {
                map.insert(assessment.candidate_id.0.clone(), assessment);
            }
        }
        *source.total.lock().unwrap() = total;
        source
    }
}

#[async_trait]
impl AssessmentSource for MemoryAssessmentSource {
    async fn assessment_for(
        &self,
        candidate_id: &CandidateId,
    ) -> StoreResult<Option<QualityAssessment>> {
        let assessments = self.assessments.lock().unwrap();
        Ok(assessments.get(&candidate_id.0).cloned())
    }

    async fn total_assessed(&self) -> StoreResult<usize> {
        Ok(*self.total.lock().unwrap())
    }
}
