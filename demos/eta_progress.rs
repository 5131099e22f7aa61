//! Watch the linear ETA converge as batches accumulate.
//!
//! The first batch is deliberately slower (cold start), which skews the
//! early estimate high. Later batches pull the average back down.
//!
//! ```sh
//! cargo run --example eta_progress
//! ```

use std::time::Duration;

use label_batch::*;

struct ColdStartRenderer;

impl ItemTransform<u32> for ColdStartRenderer {
    type Output = u32;

    async fn transform(&self, item: &u32, index: usize) -> anyhow::Result<u32> {
        // The first batch pays a warm-up cost.
        let cost = if index < 10 { 80 } else { 20 };
        tokio::time::sleep(Duration::from_millis(cost)).await;
        Ok(*item)
    }
}

#[tokio::main]
async fn main() {
    let items: Vec<u32> = (0..60).collect();
    let runner = BatchRunner::new(BatchConfig::builder().with_batch_size(10).build());

    let outcome = runner
        .run_with_progress(&items, &ColdStartRenderer, |s| {
            println!(
                "  Batch {}/{}: {:>3.0}%  elapsed {:>4}ms  eta {:>4}ms",
                s.batch_index + 1,
                s.batch_count,
                s.percentage,
                s.elapsed_ms,
                s.eta_remaining_ms.unwrap_or(0)
            );
        })
        .await;

    println!("Actual total: {}ms", outcome.elapsed_ms);
    println!("Early estimates run high after a slow first batch; they settle as data accumulates.");
}
