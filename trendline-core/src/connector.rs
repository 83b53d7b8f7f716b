use async_trait::async_trait;

use crate::frame::RawFrame;
use crate::related::RelatedQueriesResponse;
use crate::{DEFAULT_BATCH_SIZE, InterestRequest, KeywordBatch, TrendError};

/// Focused role trait for connectors that report search interest over time.
///
/// This is the query-executor boundary of the pipeline: one call per keyword
/// batch, returning the remote's table (possibly degenerate) or an error.
#[async_trait]
pub trait InterestOverTimeProvider: Send + Sync {
    /// Fetch search interest over `req.timeframe` for every keyword in `batch`.
    async fn interest_over_time(
        &self,
        batch: &KeywordBatch,
        req: &InterestRequest,
    ) -> Result<RawFrame, TrendError>;
}

/// Focused role trait for connectors that report related queries.
#[async_trait]
pub trait RelatedQueriesProvider: Send + Sync {
    /// Fetch top and rising related queries for every keyword in `batch`.
    async fn related_queries(
        &self,
        batch: &KeywordBatch,
        req: &InterestRequest,
    ) -> Result<RelatedQueriesResponse, TrendError>;
}

/// Primary connector interface.
///
/// Connectors advertise capabilities by returning trait object references
/// from the `as_*_provider` methods; the defaults advertise nothing.
pub trait TrendConnector: Send + Sync {
    /// A stable identifier used in logs and connector-tagged errors.
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Largest number of keywords the remote accepts in one call.
    fn max_keywords_per_query(&self) -> usize {
        DEFAULT_BATCH_SIZE
    }

    /// Advertise interest-over-time capability.
    fn as_interest_over_time_provider(&self) -> Option<&dyn InterestOverTimeProvider> {
        None
    }

    /// Advertise related-queries capability.
    fn as_related_queries_provider(&self) -> Option<&dyn RelatedQueriesProvider> {
        None
    }
}
