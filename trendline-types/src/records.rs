//! Long-format output rows and the shared reference date axis.

use chrono::NaiveDate;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::TrendError;
use crate::keyword::Keyword;

/// One sample of search interest for one keyword.
///
/// Field order matches the success sink columns: `date,keyword,search_interest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRecord {
    /// Sampling date (ISO `YYYY-MM-DD`).
    pub date: NaiveDate,
    /// The keyword this sample belongs to.
    pub keyword: String,
    /// Non-negative interest score; `0` for synthesized rows.
    pub search_interest: f64,
}

impl InterestRecord {
    /// Build a validated record.
    ///
    /// # Errors
    /// Returns `Parse` if `value` is negative or not finite.
    pub fn new(date: NaiveDate, keyword: &Keyword, value: f64) -> Result<Self, TrendError> {
        if !value.is_finite() || value < 0.0 {
            return Err(TrendError::parse(format!(
                "invalid search interest {value} for '{keyword}' at {date}"
            )));
        }
        Ok(Self {
            date,
            keyword: keyword.to_string(),
            search_interest: value,
        })
    }

    /// Zero-valued record used when the remote returned no data.
    #[must_use]
    pub fn zero(date: NaiveDate, keyword: &Keyword) -> Self {
        Self {
            date,
            keyword: keyword.to_string(),
            search_interest: 0.0,
        }
    }
}

/// Canonical sampling dates obtained from an anchor query.
///
/// Invariant: non-empty and monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct ReferenceAxis(Vec<NaiveDate>);

impl ReferenceAxis {
    /// Validate and wrap a date column.
    ///
    /// # Errors
    /// Returns `Parse` when `dates` is empty or goes backwards.
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, TrendError> {
        if dates.is_empty() {
            return Err(TrendError::parse("reference axis is empty"));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] < w[0]) {
            return Err(TrendError::parse(format!(
                "reference axis is not ordered: {} precedes {}",
                w[0], w[1]
            )));
        }
        Ok(Self(dates))
    }

    /// Dates in order.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }

    /// Number of sampling points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed axis; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First sampling date.
    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        self.0.first().copied()
    }

    /// Last sampling date.
    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }
}

impl TryFrom<Vec<NaiveDate>> for ReferenceAxis {
    type Error = TrendError;

    fn try_from(value: Vec<NaiveDate>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReferenceAxis> for Vec<NaiveDate> {
    fn from(a: ReferenceAxis) -> Self {
        a.0
    }
}

/// Which related-queries list a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    /// Most popular related queries.
    Top,
    /// Queries with the largest recent growth.
    Rising,
}

impl Ranking {
    /// Lowercase label used in sinks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single related query as reported by the remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedQuery {
    /// The related search text.
    pub query: String,
    /// Relative popularity (top) or growth percentage (rising).
    pub value: f64,
}

/// Flattened related-query row written to the related-queries sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedQueryRecord {
    /// Related search text.
    pub query: String,
    /// Score reported for the query.
    pub value: f64,
    /// Keyword the query relates to.
    pub keyword: String,
    /// List the row came from.
    pub ranking: Ranking,
    /// Geography the query was issued for (`global` when unrestricted).
    pub geo: String,
    /// When the row was fetched (UTC, `YYYY-MM-DD HH:MM:SS`).
    pub query_timestamp: String,
}
