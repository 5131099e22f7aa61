use std::time::Duration;

/// Batch size used when none is configured — the sheet size the label
/// printing flow settled on.
const DEFAULT_BATCH_SIZE: usize = 50;

/// Configuration for a batch job.
///
/// Use [`BatchConfig::builder()`] for ergonomic construction, or
/// [`BatchConfig::default()`] for the defaults (batches of 50, no per-item
/// timeout).
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of items processed concurrently per batch. Values below 1 are
    /// treated as 1.
    pub batch_size: usize,

    /// Optional per-item deadline. An item that overruns it counts as a
    /// failed item; `None` means items may take as long as they need.
    pub item_timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            item_timeout: None,
        }
    }
}

impl BatchConfig {
    /// Start building a config with the builder pattern.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }
}

/// Builder for [`BatchConfig`].
#[derive(Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Set the batch size. Clamped to a minimum of 1.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size.max(1);
        self
    }

    /// Set a per-item timeout. Items exceeding it are treated as failures.
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.config.item_timeout = Some(timeout);
        self
    }

    /// Build the final [`BatchConfig`].
    pub fn build(self) -> BatchConfig {
        self.config
    }
}
