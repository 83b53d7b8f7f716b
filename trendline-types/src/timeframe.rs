//! The remote API's timeframe mini-syntax.
//!
//! Supported forms:
//! - `all`: everything since the service started recording
//! - `today N-m` / `today N-y`: trailing window of `N` months or years
//! - `YYYY-MM-DD YYYY-MM-DD`: explicit inclusive date range
//!
//! Sub-daily windows (`now N-d`, `now N-H`, hour-stamped ranges) are rejected:
//! their samples cannot be represented as ISO dates without collisions.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TrendError;

const DATE_FMT: &str = "%Y-%m-%d";

/// Unit for trailing `today N-<unit>` windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingUnit {
    /// `m`
    Months,
    /// `y`
    Years,
}

impl TrailingUnit {
    const fn suffix(self) -> char {
        match self {
            Self::Months => 'm',
            Self::Years => 'y',
        }
    }
}

/// Time window for a search-interest query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    /// Entire recorded history.
    All,
    /// Trailing window ending today.
    Trailing {
        /// Window length in `unit`s, at least 1.
        count: u32,
        /// Window unit.
        unit: TrailingUnit,
    },
    /// Explicit inclusive date range with `start <= end`.
    Range {
        /// First day of the window.
        start: NaiveDate,
        /// Last day of the window.
        end: NaiveDate,
    },
}

impl Default for Timeframe {
    /// Five years ending today, the weekly-resolution window used for
    /// long-running keyword sweeps.
    fn default() -> Self {
        Self::Trailing {
            count: 5,
            unit: TrailingUnit::Years,
        }
    }
}

impl Timeframe {
    /// Build a validated explicit range.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start` is after `end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, TrendError> {
        if start > end {
            return Err(TrendError::InvalidArg(format!(
                "timeframe start {start} is after end {end}"
            )));
        }
        Ok(Self::Range { start, end })
    }

    /// Range from `start` up to and including `today`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start` is after `today`.
    pub fn since(start: NaiveDate, today: NaiveDate) -> Result<Self, TrendError> {
        Self::range(start, today)
    }

    fn parse_trailing(window: &str) -> Result<Self, TrendError> {
        let bad =
            || TrendError::InvalidArg(format!("invalid trailing timeframe: 'today {window}'"));
        let (count, unit) = window.split_once('-').ok_or_else(bad)?;
        let count: u32 = count.parse().map_err(|_| bad())?;
        if count == 0 {
            return Err(bad());
        }
        let unit = match unit {
            "m" => TrailingUnit::Months,
            "y" => TrailingUnit::Years,
            _ => return Err(bad()),
        };
        Ok(Self::Trailing { count, unit })
    }
}

impl FromStr for Timeframe {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "all" {
            return Ok(Self::All);
        }
        if let Some(rest) = s.strip_prefix("today ") {
            return Self::parse_trailing(rest.trim());
        }
        if s.starts_with("now ") {
            return Err(TrendError::InvalidArg(format!(
                "sub-daily timeframe '{s}' is not supported"
            )));
        }
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => {
                let start = NaiveDate::parse_from_str(a, DATE_FMT)
                    .map_err(|e| TrendError::InvalidArg(format!("invalid start date '{a}': {e}")))?;
                let end = NaiveDate::parse_from_str(b, DATE_FMT)
                    .map_err(|e| TrendError::InvalidArg(format!("invalid end date '{b}': {e}")))?;
                Self::range(start, end)
            }
            _ => Err(TrendError::InvalidArg(format!("invalid timeframe: '{s}'"))),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Trailing { count, unit } => write!(f, "today {count}-{}", unit.suffix()),
            Self::Range { start, end } => {
                write!(f, "{} {}", start.format(DATE_FMT), end.format(DATE_FMT))
            }
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TrendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(t: Timeframe) -> Self {
        t.to_string()
    }
}
