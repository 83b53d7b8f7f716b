//! Re-export of foundational types from `trendline-types`.
// Consolidated re-exports so downstream crates can depend on `trendline-core` only

pub use trendline_types::{Capability, TrendError};

pub use trendline_types::{
    BackoffConfig, DEFAULT_ANCHOR_KEYWORDS, DEFAULT_BATCH_SIZE, PipelineConfig,
};
pub use trendline_types::{BatchReport, BatchStatus, PauseCause, PauseRecord, RunReport};
pub use trendline_types::{InterestRequest, QueryOutcome, Timeframe, TrailingUnit};
pub use trendline_types::{
    InterestRecord, Keyword, KeywordBatch, Ranking, ReferenceAxis, RelatedQuery,
    RelatedQueryRecord, parse_keywords,
};
