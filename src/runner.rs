use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::eta::EtaEstimator;
use crate::types::{BatchOutcome, JobState, ProgressSnapshot};
use crate::ItemTransform;

/// Cloneable handle for observing and cancelling a job from outside the
/// driving loop (e.g. a cancel button wired to a running label export).
#[derive(Debug, Clone)]
pub struct JobHandle {
    job_id: String,
    cancel: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl JobHandle {
    /// The id of the job this handle observes.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current state of the job.
    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Request cooperative cancellation.
    ///
    /// The flag is observed between batches: the in-flight batch finishes and
    /// is included in the result, and no further batch starts. Idempotent —
    /// repeated calls, or calls after the job reached a terminal state, have
    /// no additional effect.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
        // Only a running job moves to Cancelling; terminal states stay put.
        let _ = self.state.compare_exchange(
            JobState::Running.as_u8(),
            JobState::Cancelling.as_u8(),
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Drives one chunked job over a sequence of input items.
///
/// Items are partitioned into batches of `batch_size`. Batches run strictly
/// in order; the items inside a batch run concurrently. After each batch the
/// runner reports a [`ProgressSnapshot`] and yields to the scheduler so
/// cancellation requests queued by other tasks are observed before the next
/// batch starts.
///
/// A runner instance drives exactly one job: [`run()`](Self::run) consumes
/// it, and a new job requires a new runner. Multiple runners are fully
/// independent and can drive jobs side by side.
#[derive(Debug)]
pub struct BatchRunner {
    job_id: String,
    config: BatchConfig,
    cancel: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl BatchRunner {
    /// Create a runner for a new job with a generated job id.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            state: Arc::new(AtomicU8::new(JobState::Idle.as_u8())),
        }
    }

    /// Replace the generated job id with a caller-supplied one.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    /// The id of the job this runner drives.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current state of the job.
    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Request cooperative cancellation. See [`JobHandle::cancel`].
    pub fn cancel(&self) {
        self.handle().cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Get a handle that can observe and cancel the job while
    /// [`run()`](Self::run) holds the runner.
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            job_id: self.job_id.clone(),
            cancel: Arc::clone(&self.cancel),
            state: Arc::clone(&self.state),
        }
    }

    /// Run the job without progress reporting.
    pub async fn run<T, H>(self, items: &[T], handler: &H) -> BatchOutcome<H::Output>
    where
        T: Send + Sync,
        H: ItemTransform<T>,
    {
        self.run_with_progress(items, handler, |_| {}).await
    }

    /// Run the job, invoking `on_progress` after every completed batch.
    ///
    /// Behavior:
    /// - Batches are processed sequentially; items within a batch
    ///   concurrently. Outputs keep input order regardless of which item
    ///   finishes first.
    /// - Fail-fast: the first item failure (or per-item timeout) discards
    ///   that batch's outputs, skips all remaining batches, and finishes the
    ///   job as `Failed`. `failed_at` carries the lowest failing index.
    /// - Cancellation is checked before each batch. The in-flight batch
    ///   always completes; the outcome then carries everything processed so
    ///   far with `cancelled = true`.
    /// - An empty item list completes immediately with no progress calls.
    ///
    /// This method never panics on account of the handler or the progress
    /// sink: a panicking `on_progress` is caught and logged, and a panicking
    /// transform is caught and reported as that item's failure. Errors from
    /// `handler` are reported through the outcome, not returned.
    pub async fn run_with_progress<T, H, F>(
        self,
        items: &[T],
        handler: &H,
        mut on_progress: F,
    ) -> BatchOutcome<H::Output>
    where
        T: Send + Sync,
        H: ItemTransform<T>,
        F: FnMut(ProgressSnapshot),
    {
        let total = items.len();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = total.div_ceil(batch_size);
        let started_at = chrono::Utc::now().to_rfc3339();
        let eta = EtaEstimator::new(total);

        self.state
            .store(JobState::Running.as_u8(), Ordering::Relaxed);

        let mut outputs: Vec<H::Output> = Vec::with_capacity(total);
        let mut error: Option<BatchError> = None;

        for batch_index in 0..batch_count {
            if self.cancel.load(Ordering::Relaxed) {
                self.state
                    .store(JobState::Cancelling.as_u8(), Ordering::Relaxed);
                break;
            }

            let start = batch_index * batch_size;
            let end = (start + batch_size).min(total);

            match self.process_batch(&items[start..end], start, handler).await {
                Ok(batch_outputs) => outputs.extend(batch_outputs),
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }

            let snapshot = ProgressSnapshot {
                job_id: self.job_id.clone(),
                processed: outputs.len(),
                total,
                percentage: eta.percentage(outputs.len()),
                batch_index,
                batch_count,
                elapsed_ms: eta.elapsed_ms(),
                eta_remaining_ms: eta.remaining_ms(outputs.len()),
            };

            if panic::catch_unwind(AssertUnwindSafe(|| on_progress(snapshot))).is_err() {
                eprintln!(
                    "[label-batch] Progress callback panicked for job {}; continuing",
                    self.job_id
                );
            }

            // Let queued cancel requests and progress consumers run before
            // the next batch starts.
            tokio::task::yield_now().await;
        }

        let cancelled = error.is_none() && self.cancel.load(Ordering::Relaxed);
        let final_state = if error.is_some() {
            JobState::Failed
        } else {
            JobState::Completed
        };
        self.state.store(final_state.as_u8(), Ordering::Relaxed);

        BatchOutcome {
            job_id: self.job_id,
            outputs,
            total,
            cancelled,
            failed_at: error.as_ref().map(|e| e.index()),
            error,
            elapsed_ms: eta.elapsed_ms(),
            started_at,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Transform one slice of items concurrently and wait for all to settle.
    ///
    /// Outputs come back in slice order. On failure the whole slice's outputs
    /// are discarded and the error with the lowest item index is returned, so
    /// no partially-rendered batch ever reaches the result. A panicking
    /// transform is caught and counted as that item's failure.
    async fn process_batch<T, H>(
        &self,
        batch: &[T],
        offset: usize,
        handler: &H,
    ) -> Result<Vec<H::Output>, BatchError>
    where
        T: Send + Sync,
        H: ItemTransform<T>,
    {
        let item_timeout = self.config.item_timeout;

        let futures = batch.iter().enumerate().map(|(i, item)| {
            let index = offset + i;
            async move {
                let attempt = async {
                    let result = match item_timeout {
                        Some(limit) => {
                            match tokio::time::timeout(limit, handler.transform(item, index)).await
                            {
                                Ok(result) => result,
                                Err(_) => {
                                    return Err(BatchError::ItemTimeout {
                                        index,
                                        timeout_ms: limit.as_millis() as u64,
                                    })
                                }
                            }
                        }
                        None => handler.transform(item, index).await,
                    };
                    result.map_err(|e| BatchError::ItemFailed {
                        index,
                        message: format!("{:#}", e),
                    })
                };
                // An unwinding transform fails its item; the job itself
                // never panics.
                match AssertUnwindSafe(attempt).catch_unwind().await {
                    Ok(settled) => settled,
                    Err(payload) => Err(BatchError::ItemFailed {
                        index,
                        message: format!("panicked: {}", panic_message(payload)),
                    }),
                }
            }
        });

        // join_all keeps submission order and never short-circuits, so every
        // in-flight transform settles even when one of them fails.
        let settled = join_all(futures).await;

        let mut outputs = Vec::with_capacity(batch.len());
        for result in settled {
            outputs.push(result?);
        }
        Ok(outputs)
    }
}

/// Best-effort text of a panic payload; `panic!` produces `&str` or `String`.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
