//! Trendline data transfer objects, configuration primitives and the shared error type.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;
mod keyword;
mod records;
mod reports;
mod request;
/// Timeframe mini-syntax parsing and formatting.
pub mod timeframe;

pub use capability::Capability;
pub use config::{BackoffConfig, DEFAULT_ANCHOR_KEYWORDS, DEFAULT_BATCH_SIZE, PipelineConfig};
pub use error::TrendError;
pub use keyword::{Keyword, KeywordBatch, parse_keywords};
pub use records::{
    InterestRecord, Ranking, ReferenceAxis, RelatedQuery, RelatedQueryRecord,
};
pub use reports::{BatchReport, BatchStatus, PauseCause, PauseRecord, RunReport};
pub use request::{InterestRequest, QueryOutcome};
pub use timeframe::{Timeframe, TrailingUnit};
