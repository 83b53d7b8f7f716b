use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Arc;
use std::time::Duration;

use trendline_core::{
    BackoffConfig, Keyword, KeywordBatch, PipelineConfig, TrendConnector, TrendError,
    parse_keywords,
};

use crate::context::RunContext;

/// Orchestrator that drives batched queries against one connector.
pub struct Trendline {
    pub(crate) connector: Arc<dyn TrendConnector>,
    pub(crate) cfg: PipelineConfig,
    pub(crate) max_retries: NonZeroU32,
    pub(crate) anchor: Vec<Keyword>,
    pub(crate) jitter_seed: Option<u64>,
}

/// Builder for constructing a `Trendline` orchestrator with custom configuration.
pub struct TrendlineBuilder {
    connector: Option<Arc<dyn TrendConnector>>,
    cfg: PipelineConfig,
    jitter_seed: Option<u64>,
}

impl Default for TrendlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendlineBuilder {
    /// Create a new builder with the default pipeline configuration.
    ///
    /// Defaults: batches of 5, 3 attempts per batch, a 10s backoff base that
    /// grows by 3s per failed attempt with ±3s jitter, a 60s per-call timeout
    /// and the `pizza`/`lufthansa` anchor query.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: PipelineConfig::default(),
            jitter_seed: None,
        }
    }

    /// Register the connector that executes queries. A later call replaces an earlier one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TrendConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    #[must_use]
    pub fn config(mut self, cfg: PipelineConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Keywords per remote call. Must not exceed the connector's limit.
    #[must_use]
    pub const fn batch_size(mut self, size: NonZeroUsize) -> Self {
        self.cfg.batch_size = size;
        self
    }

    /// Attempts per batch before the batch is recorded as failed. Must be at least 1.
    #[must_use]
    pub const fn max_retries(mut self, n: u32) -> Self {
        self.cfg.max_retries = n;
        self
    }

    /// Starting backoff base.
    #[must_use]
    pub const fn base_timeout(mut self, base: Duration) -> Self {
        self.cfg.backoff.base_timeout = base;
        self
    }

    /// Full backoff policy (base, per-failure increment, jitter half-width).
    #[must_use]
    pub const fn backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.backoff = cfg;
        self
    }

    /// Upper bound for one connector call; a call exceeding it counts as a failed attempt.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Keywords of the anchor query used to resolve the reference date axis.
    #[must_use]
    pub fn anchor_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.anchor_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Drop repeated keywords before batching (first occurrence wins).
    #[must_use]
    pub const fn dedup_keywords(mut self, yes: bool) -> Self {
        self.cfg.dedup_keywords = yes;
        self
    }

    /// Seed the jitter generator so pause lengths are reproducible.
    #[must_use]
    pub const fn jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    /// Validate the configuration and build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector is registered, `max_retries` is 0,
    /// the batch size exceeds the connector's per-call keyword limit, or the
    /// anchor keywords are empty, blank or too many for one call.
    pub fn build(self) -> Result<Trendline, TrendError> {
        let connector = self
            .connector
            .ok_or_else(|| TrendError::InvalidArg("no connector registered".into()))?;
        let max_retries = NonZeroU32::new(self.cfg.max_retries)
            .ok_or_else(|| TrendError::InvalidArg("max_retries must be at least 1".into()))?;

        let limit = connector.max_keywords_per_query();
        if self.cfg.batch_size.get() > limit {
            return Err(TrendError::InvalidArg(format!(
                "batch size {} exceeds {}'s limit of {limit} keywords per query",
                self.cfg.batch_size,
                connector.name()
            )));
        }

        let anchor = parse_keywords(&self.cfg.anchor_keywords)?;
        if anchor.is_empty() || anchor.len() > limit {
            return Err(TrendError::InvalidArg(format!(
                "anchor query needs between 1 and {limit} keywords, got {}",
                anchor.len()
            )));
        }

        Ok(Trendline {
            connector,
            cfg: self.cfg,
            max_retries,
            anchor,
            jitter_seed: self.jitter_seed,
        })
    }
}

impl Trendline {
    /// Start building a new `Trendline` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use trendline::Trendline;
    ///
    /// let trends = Trendline::builder()
    ///     .with_connector(Arc::new(MyConnector::new()))
    ///     .max_retries(5)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> TrendlineBuilder {
        TrendlineBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// The registered connector.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn TrendConnector> {
        &self.connector
    }

    pub(crate) fn anchor_batch(&self) -> KeywordBatch {
        KeywordBatch::new(0, self.anchor.clone())
    }

    /// Fresh backoff state for one run.
    pub(crate) fn run_context(&self) -> RunContext {
        RunContext::new(self.cfg.backoff, self.jitter_seed)
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TrendError>
    where
        Fut: core::future::Future<Output = Result<T, TrendError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TrendError::provider_timeout(connector_name, capability)))
    }
}
