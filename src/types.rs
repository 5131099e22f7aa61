use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Lifecycle state of a batch job.
///
/// `Completed` and `Failed` are terminal. Cancellation is not a state of its
/// own at the end of the lifecycle: a cancelled job finishes as `Completed`
/// with `cancelled = true` on its [`BatchOutcome`], once the in-flight batch
/// has been allowed to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobState {
    Idle,
    Running,
    Cancelling,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_u8(&self) -> u8 {
        match self {
            JobState::Idle => 0,
            JobState::Running => 1,
            JobState::Cancelling => 2,
            JobState::Completed => 3,
            JobState::Failed => 4,
        }
    }

    pub fn from_u8(val: u8) -> Self {
        match val {
            1 => JobState::Running,
            2 => JobState::Cancelling,
            3 => JobState::Completed,
            4 => JobState::Failed,
            _ => JobState::Idle,
        }
    }

    /// Whether the job can transition any further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Progress report produced after each completed batch.
///
/// Snapshots are purely derived values: the consumer may clone, serialize,
/// or discard them freely without affecting the job. One snapshot is emitted
/// per completed batch, in batch order; an empty job emits none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Identifier of the job this snapshot belongs to.
    pub job_id: String,
    /// Items processed so far (monotonically increasing).
    pub processed: usize,
    /// Total number of items in the job.
    pub total: usize,
    /// `processed / total` scaled to 0..=100 (0 for an empty job).
    pub percentage: f64,
    /// Index of the batch that just completed.
    pub batch_index: usize,
    /// Total number of batches in the job.
    pub batch_count: usize,
    /// Wall-clock time since the job started, in milliseconds.
    pub elapsed_ms: u64,
    /// Linear-extrapolation estimate of the remaining time, in milliseconds.
    /// `None` until at least one item has been processed.
    pub eta_remaining_ms: Option<u64>,
}

/// Final result of a batch job.
///
/// `outputs` holds one entry per successfully processed input, in input
/// order. Under the fail-fast policy a failing batch contributes nothing:
/// `outputs` then covers exactly the fully successful batches that preceded
/// the failure.
#[derive(Debug, Clone)]
pub struct BatchOutcome<R> {
    /// Identifier of the job that produced this outcome.
    pub job_id: String,
    /// Outputs in input order, one per successfully processed item.
    pub outputs: Vec<R>,
    /// Total number of items the job was started with.
    pub total: usize,
    /// Whether the job stopped early because cancellation was requested.
    pub cancelled: bool,
    /// Original index of the first failing item, if the job failed.
    pub failed_at: Option<usize>,
    /// The failure that stopped the job, if any.
    pub error: Option<BatchError>,
    /// Wall-clock duration of the job in milliseconds.
    pub elapsed_ms: u64,
    /// ISO 8601 timestamp taken when the job started.
    pub started_at: String,
    /// ISO 8601 timestamp taken when the job reached a terminal state.
    pub completed_at: String,
}

impl<R> BatchOutcome<R> {
    /// Number of outputs actually produced.
    pub fn produced(&self) -> usize {
        self.outputs.len()
    }

    /// Whether every item was processed without failure or cancellation.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.cancelled
    }

    /// Whether the job ended in the `Failed` state.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Terminal state this outcome represents.
    pub fn state(&self) -> JobState {
        if self.error.is_some() {
            JobState::Failed
        } else {
            JobState::Completed
        }
    }

    /// Serializable digest of this outcome for event emission or UI display.
    pub fn summary(&self) -> CompletionSummary {
        CompletionSummary {
            job_id: self.job_id.clone(),
            total: self.total,
            produced: self.outputs.len(),
            cancelled: self.cancelled,
            failed_at: self.failed_at,
            error: self.error.as_ref().map(|e| e.to_string()),
            elapsed_ms: self.elapsed_ms,
            started_at: self.started_at.clone(),
            completed_at: self.completed_at.clone(),
        }
    }
}

/// Summary of a finished batch job, without the outputs themselves.
///
/// This is the piece a frontend needs for messages like
/// "142 of 260 labels generated before cancellation".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub job_id: String,
    pub total: usize,
    pub produced: usize,
    pub cancelled: bool,
    pub failed_at: Option<usize>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
    pub started_at: String,
    pub completed_at: String,
}
