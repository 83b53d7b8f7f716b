//! Query parameters passed to connectors and the outcome sum type.

use serde::{Deserialize, Serialize};

use crate::error::TrendError;
use crate::timeframe::Timeframe;

/// Parameters shared by every query in a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterestRequest {
    /// Time window to query.
    pub timeframe: Timeframe,
    /// Two-letter geography code such as `US` or `DE`; empty for worldwide.
    pub geo: String,
    /// Remote category id; `0` for all categories.
    pub category: u32,
}

impl InterestRequest {
    /// Worldwide, all-category request for the given timeframe.
    #[must_use]
    pub const fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            geo: String::new(),
            category: 0,
        }
    }

    /// Restrict the request to a geography.
    #[must_use]
    pub fn geo(mut self, geo: impl Into<String>) -> Self {
        self.geo = geo.into();
        self
    }

    /// Restrict the request to a category.
    #[must_use]
    pub const fn category(mut self, category: u32) -> Self {
        self.category = category;
        self
    }

    /// Label used for the geography column of related-query rows.
    #[must_use]
    pub fn geo_label(&self) -> &str {
        if self.geo.is_empty() { "global" } else { &self.geo }
    }
}

/// Result of one query attempt: a normalized payload or the reason it failed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    /// The query returned a usable payload.
    Success(T),
    /// The query raised or returned something unusable.
    Failure(TrendError),
}

impl<T> QueryOutcome<T> {
    /// Whether the attempt succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> From<Result<T, TrendError>> for QueryOutcome<T> {
    fn from(r: Result<T, TrendError>) -> Self {
        match r {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}
