//! Report envelopes produced by the pipelines.
//!
//! Reports summarize a run; the CSV sinks stay the source of truth for the
//! data itself.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TrendError;

/// Why the pipeline paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseCause {
    /// Courtesy pause after a successful query.
    AfterSuccess,
    /// Backoff pause after a failed query.
    AfterFailure,
}

/// One pause taken between remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseRecord {
    /// Pause length.
    pub duration: Duration,
    /// What triggered it.
    pub cause: PauseCause,
}

/// Terminal state of one keyword batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// A query succeeded and its rows were appended to the success sink.
    Succeeded,
    /// Every attempt failed; the keywords were appended to the failure sink.
    Exhausted {
        /// Error from the final attempt.
        last_error: TrendError,
    },
}

/// Bookkeeping for one processed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Zero-based batch position in the run.
    pub index: usize,
    /// Keywords of the batch.
    pub keywords: Vec<String>,
    /// Number of query attempts made.
    pub attempts: u32,
    /// Rows appended to the success sink.
    pub rows_written: usize,
    /// Pauses taken while processing the batch, in order.
    pub pauses: Vec<PauseRecord>,
    /// Terminal state.
    pub status: BatchStatus,
}

impl BatchReport {
    /// Whether the batch ended up in the failure sink.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.status, BatchStatus::Exhausted { .. })
    }

    /// Pauses triggered by failed attempts.
    #[must_use]
    pub fn failure_pauses(&self) -> usize {
        self.pauses
            .iter()
            .filter(|p| p.cause == PauseCause::AfterFailure)
            .count()
    }
}

/// Summary of a batched run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-batch bookkeeping in processing order.
    pub batches: Vec<BatchReport>,
    /// Backoff base at the end of the run.
    pub final_base_timeout: Duration,
}

impl RunReport {
    /// Total attempts across all batches.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.batches.iter().map(|b| b.attempts).sum()
    }

    /// Total rows appended to the success sink.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.batches.iter().map(|b| b.rows_written).sum()
    }

    /// Batches that ended in the failure sink.
    pub fn exhausted(&self) -> impl Iterator<Item = &BatchReport> {
        self.batches.iter().filter(|b| b.is_exhausted())
    }

    /// Pauses triggered by failed attempts across the run.
    #[must_use]
    pub fn failure_pauses(&self) -> usize {
        self.batches.iter().map(BatchReport::failure_pauses).sum()
    }
}
