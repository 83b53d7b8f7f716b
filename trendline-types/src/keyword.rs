//! Search terms and the batches they are submitted in.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::TrendError;

/// A single search term.
///
/// Always non-empty after trimming surrounding whitespace. The original
/// spelling (minus surrounding whitespace) is preserved since remote APIs
/// treat case and inner spacing as significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Build a keyword, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `raw` is empty after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TrendError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TrendError::InvalidArg("keyword must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the keyword text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Keyword {
    type Error = TrendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Keyword {
    type Error = TrendError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Keyword> for String {
    fn from(k: Keyword) -> Self {
        k.0
    }
}

/// Parse a list of raw strings into keywords, failing on the first empty entry.
///
/// # Errors
/// Returns `InvalidArg` naming the offending position.
pub fn parse_keywords<I, S>(raw: I) -> Result<Vec<Keyword>, TrendError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .enumerate()
        .map(|(i, s)| {
            Keyword::new(s).map_err(|_| {
                TrendError::InvalidArg(format!("keyword at position {i} is empty"))
            })
        })
        .collect()
}

/// An ordered group of keywords submitted together in one remote query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordBatch {
    /// Zero-based position of the batch within its run.
    pub index: usize,
    /// Keywords in submission order.
    pub keywords: Vec<Keyword>,
}

impl KeywordBatch {
    /// Construct a batch at the given run position.
    #[must_use]
    pub const fn new(index: usize, keywords: Vec<Keyword>) -> Self {
        Self { index, keywords }
    }

    /// Number of keywords in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the batch holds no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `keyword` is part of this batch.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.as_str() == keyword)
    }

    /// Keywords as plain strings, for logging and sinks.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.keywords.iter().map(ToString::to_string).collect()
    }
}
