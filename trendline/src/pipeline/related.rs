use std::path::PathBuf;

use async_trait::async_trait;
use trendline_core::{
    Capability, FlattenedRelated, InterestRequest, KeywordBatch, QueryOutcome,
    RelatedQueriesProvider, RunReport, Timeframe, TrendError, flatten_related, split_batches,
};

use crate::Trendline;
use crate::retry::{BatchJob, drive_batch};
use crate::sink::{FailureSink, RelatedSink};

/// Builder for a batched related-queries run.
///
/// Shares the retry and backoff policy of the interest-over-time pipeline but
/// needs no reference axis: a keyword the remote returns no list for simply
/// contributes no rows.
pub struct RelatedQueriesBuilder<'a> {
    pub(crate) trendline: &'a Trendline,
    pub(crate) keywords: Vec<String>,
    pub(crate) output_path: Option<PathBuf>,
    pub(crate) failure_path: Option<PathBuf>,
    pub(crate) request: InterestRequest,
}

impl<'a> RelatedQueriesBuilder<'a> {
    /// Create a new builder bound to a `Trendline` instance.
    #[must_use]
    pub fn new(trendline: &'a Trendline) -> Self {
        Self {
            trendline,
            keywords: Vec::new(),
            output_path: None,
            failure_path: None,
            request: InterestRequest::new(Timeframe::default()),
        }
    }

    /// Replace the keyword list.
    ///
    /// Surrounding whitespace is trimmed from each keyword; the trimmed text is
    /// what the remote is queried with and what the sinks record.
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// CSV file receiving `query,value,keyword,ranking,geo,query_timestamp` rows.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// CSV file receiving the keywords of batches that exhausted their attempts.
    #[must_use]
    pub fn failure_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.failure_path = Some(path.into());
        self
    }

    /// Query window; defaults to the trailing five years.
    #[must_use]
    pub const fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.request.timeframe = timeframe;
        self
    }

    /// Two-letter geography code; empty for worldwide.
    #[must_use]
    pub fn geo(mut self, geo: impl Into<String>) -> Self {
        self.request.geo = geo.into();
        self
    }

    /// Remote category id.
    #[must_use]
    pub const fn category(mut self, category: u32) -> Self {
        self.request.category = category;
        self
    }

    /// Execute the run batch by batch.
    ///
    /// # Errors
    /// `InvalidArg` for bad input or missing paths, `Unsupported` if the
    /// connector has no related-queries capability, `Io`/`Csv` on sink failure.
    pub async fn run(self) -> Result<RunReport, TrendError> {
        let trendline = self.trendline;
        let keywords = super::prepare_keywords(&self.keywords, trendline.cfg.dedup_keywords)?;
        let output = self
            .output_path
            .map(RelatedSink::new)
            .ok_or_else(|| TrendError::InvalidArg("no output path specified".into()))?;
        let failure = self
            .failure_path
            .map(FailureSink::new)
            .ok_or_else(|| TrendError::InvalidArg("no failure path specified".into()))?;
        let provider = trendline
            .connector
            .as_related_queries_provider()
            .ok_or_else(|| TrendError::unsupported(Capability::RelatedQueries.as_str()))?;

        let batches = split_batches(&keywords, trendline.cfg.batch_size);
        #[cfg(feature = "tracing")]
        tracing::info!(
            keywords = keywords.len(),
            batches = batches.len(),
            geo = self.request.geo_label(),
            "starting related-queries run"
        );

        let mut ctx = trendline.run_context();
        let mut report = RunReport::default();
        for batch in &batches {
            let mut job = RelatedJob {
                trendline,
                provider,
                batch,
                request: &self.request,
                output: &output,
                failure: &failure,
            };
            report
                .batches
                .push(drive_batch(&mut job, batch, trendline.max_retries, &mut ctx).await?);
        }
        report.final_base_timeout = ctx.base_timeout();
        Ok(report)
    }
}

struct RelatedJob<'a> {
    trendline: &'a Trendline,
    provider: &'a dyn RelatedQueriesProvider,
    batch: &'a KeywordBatch,
    request: &'a InterestRequest,
    output: &'a RelatedSink,
    failure: &'a FailureSink,
}

#[async_trait]
impl<'a> BatchJob for RelatedJob<'a> {
    type Output = FlattenedRelated;

    async fn query(&mut self, _attempt: u32) -> QueryOutcome<Self::Output> {
        let fetched_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Trendline::provider_call_with_timeout(
            self.trendline.connector.name(),
            Capability::RelatedQueries.as_str(),
            self.trendline.cfg.provider_timeout,
            self.provider.related_queries(self.batch, self.request),
        )
        .await
        .map(|resp| flatten_related(&resp, self.batch, self.request.geo_label(), &fetched_at))
        .into()
    }

    fn persist(&mut self, output: Self::Output) -> Result<usize, TrendError> {
        #[cfg(feature = "tracing")]
        {
            for (keyword, ranking) in &output.missing {
                tracing::warn!(
                    batch = self.batch.index,
                    keyword = %keyword,
                    %ranking,
                    "no related queries returned"
                );
            }
        }
        self.output.append(&output.records)
    }

    fn record_failure(&mut self) -> Result<(), TrendError> {
        self.failure.append(&self.batch.keywords).map(|_| ())
    }
}

impl Trendline {
    /// Begin building a batched related-queries run.
    #[must_use]
    pub fn related_queries(&self) -> RelatedQueriesBuilder<'_> {
        RelatedQueriesBuilder::new(self)
    }
}
