//! Render a small label sheet in batches with progress output.
//!
//! ```sh
//! cargo run --example basic_run
//! ```

use std::time::Duration;

use label_batch::*;

#[derive(Debug, Clone)]
struct Product {
    sku: String,
    name: String,
}

struct QrRenderer;

impl ItemTransform<Product> for QrRenderer {
    type Output = String;

    async fn transform(&self, item: &Product, _index: usize) -> anyhow::Result<String> {
        // Stand-in for real QR rendering work.
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(format!("{} | qr://inventory/{}", item.name, item.sku))
    }
}

#[tokio::main]
async fn main() {
    let products: Vec<Product> = (1..=12)
        .map(|i| Product {
            sku: format!("SKU-{:04}", i),
            name: format!("Product {}", i),
        })
        .collect();

    let runner = BatchRunner::new(BatchConfig::builder().with_batch_size(5).build());
    println!("Job {} over {} products", runner.job_id(), products.len());

    let outcome = runner
        .run_with_progress(&products, &QrRenderer, |snapshot| {
            println!(
                "  Batch {}/{}: {}/{} labels ({:.0}%)",
                snapshot.batch_index + 1,
                snapshot.batch_count,
                snapshot.processed,
                snapshot.total,
                snapshot.percentage
            );
        })
        .await;

    println!(
        "Done: {} of {} labels in {}ms",
        outcome.produced(),
        outcome.total,
        outcome.elapsed_ms
    );
    for label in outcome.outputs.iter().take(3) {
        println!("  {}", label);
    }
}
