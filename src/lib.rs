//! # Label Batch
//!
//! Chunked batch-job runner with progress reporting, ETA estimation, and
//! cooperative cancellation, for client-driven bulk work such as rendering
//! printable QR-code label sheets.
//!
//! ## Key Features
//!
//! - **Sequential batches, concurrent items** — peak concurrency is bounded
//!   by the batch size while the items inside a batch still overlap
//! - **Per-batch progress with linear ETA** — one snapshot after every
//!   completed batch, with percentage, elapsed and estimated remaining time
//! - **Cooperative cancellation** — a cancel request lets the in-flight
//!   batch finish, keeps its outputs, and skips the rest
//! - **Fail-fast error policy** — the first failing item stops the job and
//!   is reported with its original index
//! - **Outcome, not panic** — a run always resolves to a [`BatchOutcome`];
//!   item errors, timeouts and cancellation are carried as data
//!
//! ## Quick Start
//!
//! 1. Implement [`ItemTransform`] for your per-item rendering logic
//! 2. Build a [`BatchConfig`] with the batch size you want
//! 3. Create a [`BatchRunner`] and keep a [`JobHandle`] if you need to
//!    cancel from elsewhere
//! 4. Await [`BatchRunner::run_with_progress()`] and feed the snapshots to
//!    your UI
//!
//! See the `demos/` directory for complete usage examples.

pub mod config;
pub mod error;
pub mod eta;
pub mod runner;
pub mod types;

pub use config::{BatchConfig, BatchConfigBuilder};
pub use error::BatchError;
pub use runner::{BatchRunner, JobHandle};
pub use types::{BatchOutcome, CompletionSummary, JobState, ProgressSnapshot};

/// Trait for rendering individual items of a batch job.
///
/// Implement this for your application to define how one input item becomes
/// one output (e.g. product record in, QR payload out). The runner calls
/// [`transform`](Self::transform) once per item, concurrently within a
/// batch, sequentially across batches.
///
/// # Type Parameter
///
/// `T` is the input item type. [`Output`](Self::Output) is what each item
/// renders to.
///
/// # Example
///
/// ```ignore
/// use label_batch::*;
///
/// struct QrRenderer {
///     base_url: String,
/// }
///
/// impl ItemTransform<Product> for QrRenderer {
///     type Output = QrLabel;
///
///     async fn transform(&self, item: &Product, index: usize) -> anyhow::Result<QrLabel> {
///         let payload = format!("{}/p/{}", self.base_url, item.sku);
///         render_qr(&payload).await
///     }
/// }
/// ```
pub trait ItemTransform<T>: Send + Sync
where
    T: Send + Sync,
{
    /// What each successfully transformed item produces.
    type Output: Send;

    /// Transform a single item.
    ///
    /// # Arguments
    /// * `item` — the input item; treat it as read-only
    /// * `index` — the item's position in the full input sequence
    ///
    /// Return `Err` to report the item as failed. The runner turns it into
    /// a job-level failure carrying this item's index; it never crashes the
    /// run itself.
    fn transform(
        &self,
        item: &T,
        index: usize,
    ) -> impl std::future::Future<Output = anyhow::Result<Self::Output>> + Send;
}
