use std::sync::Arc;
use std::time::Duration;

use trendline::{BackoffConfig, Trendline, timestamped_path};
use trendline_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let trends = Trendline::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .backoff(BackoffConfig {
            base_timeout: Duration::from_secs(1),
            increment: Duration::from_secs(1),
            jitter: Duration::ZERO,
        })
        .build()?;

    let dir = std::env::temp_dir().join("trendline-demo");
    let output = timestamped_path(&dir, "related");
    let report = trends
        .related_queries()
        .keywords(["adidas", "allianz"])
        .geo("DE")
        .output_path(&output)
        .failure_path(timestamped_path(&dir, "related_failed"))
        .run()
        .await?;

    println!("{} related queries -> {}", report.rows_written(), output.display());
    Ok(())
}
