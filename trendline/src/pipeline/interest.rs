use std::path::PathBuf;

use async_trait::async_trait;
use trendline_core::{
    Capability, InterestOverTimeProvider, InterestRecord, InterestRequest, KeywordBatch,
    QueryOutcome, ReferenceAxis, RunReport, Timeframe, TrendError, normalize_frame,
    split_batches,
};

use crate::Trendline;
use crate::retry::{BatchJob, drive_batch};
use crate::sink::{FailureSink, InterestSink};

/// Builder for a batched interest-over-time run.
pub struct InterestOverTimeBuilder<'a> {
    pub(crate) trendline: &'a Trendline,
    pub(crate) keywords: Vec<String>,
    pub(crate) success_path: Option<PathBuf>,
    pub(crate) failure_path: Option<PathBuf>,
    pub(crate) request: InterestRequest,
}

impl<'a> InterestOverTimeBuilder<'a> {
    /// Create a new builder bound to a `Trendline` instance.
    ///
    /// Starts with no keywords, no sink paths and the default five-year window.
    /// Validation is deferred to `run()`.
    #[must_use]
    pub fn new(trendline: &'a Trendline) -> Self {
        Self {
            trendline,
            keywords: Vec::new(),
            success_path: None,
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

    /// Append one keyword, trimmed like those passed to [`Self::keywords`].
    #[must_use]
    pub fn add_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// CSV file receiving `date,keyword,search_interest` rows.
    #[must_use]
    pub fn success_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.success_path = Some(path.into());
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

    /// Remote category id; `0` for all categories.
    #[must_use]
    pub const fn category(mut self, category: u32) -> Self {
        self.request.category = category;
        self
    }

    /// Execute the run: resolve the reference axis once, split the keywords
    /// into batches and drive each batch through the retry machine in order.
    ///
    /// Batches that exhaust their attempts are recorded in the failure sink and
    /// the run continues. The returned report summarizes the run; the sinks
    /// hold the data.
    ///
    /// # Errors
    /// - `InvalidArg` for an empty keyword list, a blank keyword or a missing sink path.
    /// - `Unsupported` if the connector cannot report interest over time.
    /// - `ReferenceAxis` if the anchor query fails.
    /// - `Io`/`Csv` if a sink cannot be written.
    pub async fn run(self) -> Result<RunReport, TrendError> {
        let trendline = self.trendline;
        let keywords = super::prepare_keywords(&self.keywords, trendline.cfg.dedup_keywords)?;
        let success = self
            .success_path
            .map(InterestSink::new)
            .ok_or_else(|| TrendError::InvalidArg("no success path specified".into()))?;
        let failure = self
            .failure_path
            .map(FailureSink::new)
            .ok_or_else(|| TrendError::InvalidArg("no failure path specified".into()))?;
        let provider = trendline
            .connector
            .as_interest_over_time_provider()
            .ok_or_else(|| TrendError::unsupported(Capability::InterestOverTime.as_str()))?;

        let axis = trendline.reference_axis(&self.request).await?;
        let batches = split_batches(&keywords, trendline.cfg.batch_size);

        #[cfg(feature = "tracing")]
        tracing::info!(
            keywords = keywords.len(),
            batches = batches.len(),
            timeframe = %self.request.timeframe,
            success = %success.path().display(),
            failure = %failure.path().display(),
            "starting interest-over-time run"
        );

        let mut ctx = trendline.run_context();
        let mut report = RunReport::default();
        for batch in &batches {
            let mut job = InterestJob {
                trendline,
                provider,
                batch,
                request: &self.request,
                axis: &axis,
                success: &success,
                failure: &failure,
            };
            let batch_report =
                drive_batch(&mut job, batch, trendline.max_retries, &mut ctx).await?;
            report.batches.push(batch_report);
        }
        report.final_base_timeout = ctx.base_timeout();

        #[cfg(feature = "tracing")]
        tracing::info!(
            rows = report.rows_written(),
            attempts = report.total_attempts(),
            exhausted = report.exhausted().count(),
            "interest-over-time run finished"
        );
        Ok(report)
    }
}

struct InterestJob<'a> {
    trendline: &'a Trendline,
    provider: &'a dyn InterestOverTimeProvider,
    batch: &'a KeywordBatch,
    request: &'a InterestRequest,
    axis: &'a ReferenceAxis,
    success: &'a InterestSink,
    failure: &'a FailureSink,
}

#[async_trait]
impl<'a> BatchJob for InterestJob<'a> {
    type Output = Vec<InterestRecord>;

    async fn query(&mut self, _attempt: u32) -> QueryOutcome<Self::Output> {
        Trendline::provider_call_with_timeout(
            self.trendline.connector.name(),
            Capability::InterestOverTime.as_str(),
            self.trendline.cfg.provider_timeout,
            self.provider.interest_over_time(self.batch, self.request),
        )
        .await
        .and_then(|frame| normalize_frame(&frame, self.batch, self.axis))
        .into()
    }

    fn persist(&mut self, output: Self::Output) -> Result<usize, TrendError> {
        self.success.append(&output)
    }

    fn record_failure(&mut self) -> Result<(), TrendError> {
        self.failure.append(&self.batch.keywords).map(|_| ())
    }
}

impl Trendline {
    /// Begin building a batched interest-over-time run.
    ///
    /// Typical usage: chain `keywords`/`success_path`/`failure_path`/`timeframe`
    /// then call `run()`.
    #[must_use]
    pub fn interest_over_time(&self) -> InterestOverTimeBuilder<'_> {
        InterestOverTimeBuilder::new(self)
    }
}
