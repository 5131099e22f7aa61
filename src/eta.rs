use tokio::time::Instant;

/// Estimate the remaining time from cumulative throughput so far.
///
/// Linear extrapolation: `elapsed / processed * (total - processed)`.
/// Returns `None` until at least one item has been processed, since there is
/// no rate to extrapolate from.
///
/// Deliberately unsmoothed — no windowing, no decay. Known limitation: a
/// slow first batch (cold caches, lazy initialization) skews early
/// estimates high. The estimate converges as batches accumulate.
pub fn linear_estimate_ms(elapsed_ms: u64, processed: usize, total: usize) -> Option<u64> {
    if processed == 0 {
        return None;
    }
    let remaining = total.saturating_sub(processed) as u128;
    let projected = elapsed_ms as u128 * remaining / processed as u128;
    Some(projected.min(u64::MAX as u128) as u64)
}

/// Tracks one job's clock and derives progress arithmetic from it.
///
/// Construction starts the clock. Uses `tokio::time::Instant`, so tests
/// under a paused runtime clock get exact, deterministic values.
#[derive(Debug)]
pub struct EtaEstimator {
    started: Instant,
    total: usize,
}

impl EtaEstimator {
    /// Start the clock for a job over `total` items.
    pub fn new(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
        }
    }

    /// Milliseconds elapsed since the job started.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Estimated milliseconds remaining after `processed` items.
    pub fn remaining_ms(&self, processed: usize) -> Option<u64> {
        linear_estimate_ms(self.elapsed_ms(), processed, self.total)
    }

    /// Completion percentage in 0..=100. An empty job reports 0.
    pub fn percentage(&self, processed: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            processed as f64 * 100.0 / self.total as f64
        }
    }
}
