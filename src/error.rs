use thiserror::Error;

/// Failure that drives a batch job into the `Failed` state.
///
/// Both variants carry the original index of the item that brought the job
/// down, so downstream messaging ("generation failed at item N") needs no
/// extra bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// An item's transform returned an error.
    #[error("item {index} failed: {message}")]
    ItemFailed { index: usize, message: String },

    /// An item's transform exceeded the configured per-item timeout.
    #[error("item {index} timed out after {timeout_ms}ms")]
    ItemTimeout { index: usize, timeout_ms: u64 },
}

impl BatchError {
    /// The original input index of the item behind this failure.
    pub fn index(&self) -> usize {
        match self {
            BatchError::ItemFailed { index, .. } => *index,
            BatchError::ItemTimeout { index, .. } => *index,
        }
    }
}
