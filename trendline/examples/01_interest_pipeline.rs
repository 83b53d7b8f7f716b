use std::sync::Arc;
use std::time::Duration;

use trendline::{
    BackoffConfig, TimeUnit, Timeframe, Trendline, aggregate_interest, read_interest_csv,
    timestamped_path,
};
use trendline_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build the orchestrator around a connector (the fixture mock here).
    let trends = Trendline::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .backoff(BackoffConfig {
            base_timeout: Duration::from_secs(2),
            increment: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        })
        .build()?;

    // 2. Fresh output paths so re-running does not duplicate rows.
    let dir = std::env::temp_dir().join("trendline-demo");
    let success = timestamped_path(&dir, "interest");
    let failure = timestamped_path(&dir, "failed");

    // 3. Run seven keywords: one full batch of five and one of two.
    let timeframe: Timeframe = "2021-01-01 2021-03-31".parse()?;
    let report = trends
        .interest_over_time()
        .keywords([
            "adidas", "allianz", "basf", "bayer", "beiersdorf", "continental", "NODATA",
        ])
        .timeframe(timeframe)
        .success_path(&success)
        .failure_path(&failure)
        .run()
        .await?;

    println!(
        "{} batches, {} attempts, {} rows -> {}",
        report.batches.len(),
        report.total_attempts(),
        report.rows_written(),
        success.display()
    );
    for b in report.exhausted() {
        println!("batch {} exhausted: {:?}", b.index, b.keywords);
    }

    // 4. Read the sink back and average per month.
    let rows = read_interest_csv(&success)?;
    for r in aggregate_interest(&rows, TimeUnit::Month).iter().take(6) {
        println!("{} {:<12} {:>6.1}", r.date, r.keyword, r.search_interest);
    }

    Ok(())
}
