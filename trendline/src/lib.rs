//! Trendline pulls search-interest time series for large keyword lists from a
//! rate-limited, unreliable remote and accumulates them into append-only CSV files.
//!
//! Overview
//! - Splits keywords into batches no larger than the connector's per-call limit.
//! - Resolves a reference date axis once per run with an anchor query, so batches
//!   for which the remote returns nothing still produce zero-valued rows on real dates.
//! - Drives every batch through a retry state machine with jittered pauses and a
//!   backoff base that grows with each failure for the remainder of the run.
//! - Appends successful rows to a success sink and the keywords of batches that
//!   exhausted their attempts to a failure sink; the run continues past them.
//!
//! Key behaviors and trade-offs
//! - Batches run strictly one after another. Concurrent requests would defeat the
//!   rate-limiting pauses and race on the shared backoff state.
//! - Sinks only write a header when they create a file. Re-running against the same
//!   paths duplicates rows; use [`timestamped_path`] for fresh per-run files.
//! - A failing anchor query aborts the run with `TrendError::ReferenceAxis`; sink
//!   I/O errors abort with `Io`/`Csv`. Query errors never escape a run.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use trendline::{Timeframe, Trendline};
//!
//! let trends = Trendline::builder()
//!     .with_connector(Arc::new(MyConnector::new()))
//!     .build()?;
//!
//! let report = trends
//!     .interest_over_time()
//!     .keywords(["adidas", "allianz", "basf"])
//!     .timeframe("2019-01-01 2023-12-31".parse::<Timeframe>()?)
//!     .success_path("out/interest.csv")
//!     .failure_path("out/failed.csv")
//!     .run()
//!     .await?;
//! for b in report.exhausted() {
//!     eprintln!("batch {} failed: {:?}", b.index, b.keywords);
//! }
//! ```
//!
//! See `trendline/examples/` for runnable demonstrations against the mock connector.
#![warn(missing_docs)]

mod axis;
/// Jittered, escalating pause state.
pub mod backoff;
mod context;
pub(crate) mod core;
mod pipeline;
/// Per-batch retry state machine and its driver.
pub mod retry;
/// Append-only CSV sinks and readers.
pub mod sink;

pub use context::RunContext;
pub use core::{Trendline, TrendlineBuilder};
pub use pipeline::interest::InterestOverTimeBuilder;
pub use pipeline::related::RelatedQueriesBuilder;
pub use sink::{
    FailureSink, InterestSink, RelatedSink, read_failed_keywords, read_interest_csv,
    timestamped_path,
};

// Re-export core types for convenience
pub use trendline_core::{
    BackoffConfig,
    BatchReport,
    BatchStatus,
    Capability,
    InterestRecord,
    InterestRequest,
    Keyword,
    KeywordBatch,
    PauseCause,
    PauseRecord,
    PipelineConfig,
    QueryOutcome,
    RawFrame,
    Ranking,
    ReferenceAxis,
    RelatedQueryRecord,
    RunReport,
    TimeUnit,
    Timeframe,
    TrendConnector,
    TrendError,
    aggregate_interest,
};
