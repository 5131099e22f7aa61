//! Cancel a long label run from another task.
//!
//! The cancel request is observed between batches: the in-flight batch
//! finishes and its labels are kept, the remaining batches never start.
//!
//! ```sh
//! cargo run --example with_cancellation
//! ```

use std::time::Duration;

use label_batch::*;

struct SlowRenderer;

impl ItemTransform<u32> for SlowRenderer {
    type Output = String;

    async fn transform(&self, item: &u32, _index: usize) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(format!("label-{}", item))
    }
}

#[tokio::main]
async fn main() {
    let items: Vec<u32> = (0..200).collect();
    let runner = BatchRunner::new(BatchConfig::builder().with_batch_size(25).build());
    let handle = runner.handle();

    // In a real app this is a cancel button; here a timer stands in for it.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        println!("Requesting cancellation...");
        handle.cancel();
    });

    let outcome = runner
        .run_with_progress(&items, &SlowRenderer, |s| {
            println!(
                "  Batch {}/{}: {} labels done",
                s.batch_index + 1,
                s.batch_count,
                s.processed
            );
        })
        .await;

    let summary = outcome.summary();
    println!(
        "{} of {} labels generated before cancellation (cancelled: {})",
        summary.produced, summary.total, summary.cancelled
    );
}
