use trendline_core::{Capability, InterestRequest, ReferenceAxis, TrendError};

use crate::Trendline;

impl Trendline {
    /// Resolve the reference date axis with one anchor query.
    ///
    /// There is no retry here: the anchor keywords are expected to always
    /// return data, so any failure aborts the run.
    ///
    /// # Errors
    /// `Unsupported` if the connector cannot report interest over time;
    /// otherwise `ReferenceAxis` wrapping the anchor query's failure, an empty
    /// anchor response or an out-of-order date column.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "trendline::axis::reference_axis",
            skip(self),
            fields(connector = self.connector.name(), timeframe = %req.timeframe),
        )
    )]
    pub async fn reference_axis(&self, req: &InterestRequest) -> Result<ReferenceAxis, TrendError> {
        let provider = self
            .connector
            .as_interest_over_time_provider()
            .ok_or_else(|| TrendError::unsupported(Capability::InterestOverTime.as_str()))?;

        let anchor = self.anchor_batch();
        let resolved = Self::provider_call_with_timeout(
            self.connector.name(),
            Capability::InterestOverTime.as_str(),
            self.cfg.provider_timeout,
            provider.interest_over_time(&anchor, req),
        )
        .await
        .and_then(|frame| frame.date_column())
        .and_then(ReferenceAxis::new);

        match resolved {
            Ok(axis) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    points = axis.len(),
                    first = ?axis.first(),
                    last = ?axis.last(),
                    "resolved reference axis"
                );
                Ok(axis)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    anchor = ?anchor.labels(),
                    error = %e,
                    "reference axis resolution failed"
                );
                Err(TrendError::reference_axis(e))
            }
        }
    }
}
