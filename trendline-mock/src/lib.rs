use std::time::Duration;

use async_trait::async_trait;
use trendline_core::connector::{InterestOverTimeProvider, RelatedQueriesProvider, TrendConnector};
use trendline_core::{InterestRequest, KeywordBatch, RawFrame, RelatedQueriesResponse, TrendError};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};
pub use fixtures::interest::{
    FIXTURE_WEEKS, fixture_dates, fixture_value, interest_table, weekly_dates,
};

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Sentinel keywords change its behavior for the whole batch:
/// `FAIL` forces a connector error, `TIMEOUT` stalls for two minutes and
/// `NODATA` yields an empty response.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(
        batch: &KeywordBatch,
        capability: &'static str,
    ) -> Result<(), TrendError> {
        if batch.contains("FAIL") {
            return Err(TrendError::connector(
                "trendline-mock",
                format!("forced failure: {capability}"),
            ));
        }
        if batch.contains("TIMEOUT") {
            // Long enough for any configured provider timeout to fire first
            tokio::time::sleep(Duration::from_secs(120)).await;
        }
        Ok(())
    }
}

impl TrendConnector for MockConnector {
    fn name(&self) -> &'static str {
        "trendline-mock"
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_interest_over_time_provider(&self) -> Option<&dyn InterestOverTimeProvider> {
        Some(self as &dyn InterestOverTimeProvider)
    }
    fn as_related_queries_provider(&self) -> Option<&dyn RelatedQueriesProvider> {
        Some(self as &dyn RelatedQueriesProvider)
    }
}

#[async_trait]
impl InterestOverTimeProvider for MockConnector {
    async fn interest_over_time(
        &self,
        batch: &KeywordBatch,
        _req: &InterestRequest,
    ) -> Result<RawFrame, TrendError> {
        Self::maybe_fail_or_timeout(batch, "interest-over-time").await?;
        Ok(fixtures::interest::for_batch(batch))
    }
}

#[async_trait]
impl RelatedQueriesProvider for MockConnector {
    async fn related_queries(
        &self,
        batch: &KeywordBatch,
        _req: &InterestRequest,
    ) -> Result<RelatedQueriesResponse, TrendError> {
        Self::maybe_fail_or_timeout(batch, "related-queries").await?;
        Ok(fixtures::related::for_batch(batch))
    }
}
