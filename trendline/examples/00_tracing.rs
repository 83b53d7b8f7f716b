use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::fmt::format::FmtSpan;
use trendline::{BackoffConfig, Trendline, timestamped_path};
use trendline_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,trendline=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Short pauses so the demo finishes quickly.
    let trends = Trendline::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .backoff(BackoffConfig {
            base_timeout: Duration::from_secs(1),
            increment: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        })
        .max_retries(2)
        .build()?;

    let dir = std::env::temp_dir().join("trendline-demo");
    // FAIL forces its batch into the failure sink; NODATA is zero-filled.
    let _ = trends
        .interest_over_time()
        .keywords(["adidas", "allianz", "basf", "bayer", "FAIL", "NODATA"])
        .success_path(timestamped_path(&dir, "interest"))
        .failure_path(timestamped_path(&dir, "failed"))
        .run()
        .await?;

    Ok(())
}
