//! Response shapes returned by connectors and their normalization into
//! long-format [`InterestRecord`]s.
//!
//! Connectors hand back one of three shapes:
//! - [`RawFrame::Empty`]: no data for any keyword in the batch
//! - [`RawFrame::Table`]: a wide table with a `date` column, one column per
//!   keyword and an optional `isPartial` marker column
//! - [`RawFrame::PerKeyword`]: one wide table per keyword
//!
//! Normalization strips the marker column and melts the wide layout into
//! `(date, keyword, search_interest)` rows, keyword-major. Empty results are
//! expanded against the reference axis so every batch keyword gets one row per
//! axis date.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timeseries::fill::zero_fill;
use crate::{InterestRecord, KeywordBatch, ReferenceAxis, TrendError};

/// Name of the date column in wide tables.
pub const DATE_COLUMN: &str = "date";
/// Name of the partial-sample marker column stripped during normalization.
pub const PARTIAL_COLUMN: &str = "isPartial";

/// Years an epoch date cell may fall in; anything else is a unit mix-up.
const EPOCH_YEARS: RangeInclusive<i32> = 2004..=2100;

/// Wide table: named columns and row-major cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WideFrame {
    /// Column names, including `date` and optionally `isPartial`.
    pub columns: Vec<String>,
    /// Rows, each with exactly one cell per column.
    pub rows: Vec<Vec<Value>>,
}

impl WideFrame {
    /// Construct a frame from columns and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn check_rectangular(&self) -> Result<(), TrendError> {
        let width = self.columns.len();
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(TrendError::parse(format!(
                "row {i} has {} cells, expected {width}",
                row.len()
            )));
        }
        Ok(())
    }

    /// Parse the `date` column.
    ///
    /// # Errors
    /// Returns `Parse` if the column is missing or a cell is not a date.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, TrendError> {
        self.check_rectangular()?;
        let idx = self
            .column_index(DATE_COLUMN)
            .ok_or_else(|| TrendError::parse("missing 'date' column"))?;
        self.rows.iter().map(|r| parse_date(&r[idx])).collect()
    }

    /// Melt the frame into long format for the keywords of `batch`.
    ///
    /// Every non-date, non-marker column must name a batch keyword and every
    /// batch keyword must have a column.
    fn melt(&self, batch: &KeywordBatch) -> Result<Vec<InterestRecord>, TrendError> {
        let dates = self.dates()?;
        for col in &self.columns {
            if col != DATE_COLUMN && col != PARTIAL_COLUMN && !batch.contains(col) {
                return Err(TrendError::parse(format!(
                    "unexpected column '{col}' not in requested batch"
                )));
            }
        }

        let mut out = Vec::with_capacity(dates.len() * batch.len());
        for keyword in &batch.keywords {
            let idx = self.column_index(keyword.as_str()).ok_or_else(|| {
                TrendError::parse(format!("missing column for keyword '{keyword}'"))
            })?;
            for (row, date) in self.rows.iter().zip(&dates) {
                let value = parse_value(&row[idx], keyword.as_str())?;
                out.push(InterestRecord::new(*date, keyword, value)?);
            }
        }
        Ok(out)
    }
}

/// A connector response before normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RawFrame {
    /// Structurally empty: the remote has no data for any keyword.
    #[default]
    Empty,
    /// One wide table covering the whole batch.
    Table(WideFrame),
    /// One wide table per keyword.
    PerKeyword(BTreeMap<String, WideFrame>),
}

impl RawFrame {
    /// Interpret a JSON rendering of one of the supported shapes.
    ///
    /// - `null`, `{}` and `[]` are empty
    /// - an object with a `columns` key is a table
    /// - an object whose values are all objects is a per-keyword map
    ///
    /// # Errors
    /// Returns `Parse` for any other shape.
    pub fn from_json(value: Value) -> Result<Self, TrendError> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::Array(a) if a.is_empty() => Ok(Self::Empty),
            Value::Object(map) if map.is_empty() => Ok(Self::Empty),
            Value::Object(map) if map.contains_key("columns") => {
                let frame: WideFrame = serde_json::from_value(Value::Object(map))
                    .map_err(|e| TrendError::parse(format!("malformed table: {e}")))?;
                Ok(Self::Table(frame))
            }
            Value::Object(map) if map.values().all(Value::is_object) => {
                let mut frames = BTreeMap::new();
                for (keyword, v) in map {
                    let frame: WideFrame = serde_json::from_value(v).map_err(|e| {
                        TrendError::parse(format!("malformed table for '{keyword}': {e}"))
                    })?;
                    frames.insert(keyword, frame);
                }
                Ok(Self::PerKeyword(frames))
            }
            other => Err(TrendError::parse(format!(
                "unrecognized response shape: {}",
                shape_name(&other)
            ))),
        }
    }

    /// Whether the frame carries no rows at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Table(t) => t.rows.is_empty(),
            Self::PerKeyword(m) => m.values().all(|t| t.rows.is_empty()),
        }
    }

    /// Date column of the response, as used for the reference axis.
    ///
    /// # Errors
    /// Returns `Parse` if the response is degenerate or its dates cannot be read.
    pub fn date_column(&self) -> Result<Vec<NaiveDate>, TrendError> {
        if self.is_degenerate() {
            return Err(TrendError::parse("response holds no dates"));
        }
        match self {
            Self::Table(t) => t.dates(),
            Self::PerKeyword(m) => m
                .values()
                .find(|t| !t.rows.is_empty())
                .map_or_else(
                    || Err(TrendError::parse("response holds no dates")),
                    WideFrame::dates,
                ),
            Self::Empty => Err(TrendError::parse("response holds no dates")),
        }
    }
}

/// Normalize a connector response into long-format records for `batch`.
///
/// Degenerate responses expand to one zero row per (keyword, axis date).
/// In the per-keyword shape a keyword without a table, or with an empty one,
/// is zero-filled on its own.
///
/// # Errors
/// Returns `Parse` for missing or unexpected columns, ragged rows, unreadable
/// dates, and negative or non-numeric values.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "trendline_core::normalize_frame",
        level = "debug",
        skip(frame, axis),
        fields(batch = batch.index, keywords = batch.len()),
    )
)]
pub fn normalize_frame(
    frame: &RawFrame,
    batch: &KeywordBatch,
    axis: &ReferenceAxis,
) -> Result<Vec<InterestRecord>, TrendError> {
    if frame.is_degenerate() {
        return Ok(zero_fill(&batch.keywords, axis));
    }
    match frame {
        RawFrame::Table(t) => t.melt(batch),
        RawFrame::PerKeyword(map) => {
            if let Some(unknown) = map.keys().find(|k| !batch.contains(k)) {
                return Err(TrendError::parse(format!(
                    "unexpected keyword '{unknown}' not in requested batch"
                )));
            }
            let mut out = Vec::new();
            for keyword in &batch.keywords {
                let single = KeywordBatch::new(batch.index, vec![keyword.clone()]);
                match map.get(keyword.as_str()) {
                    Some(t) if !t.rows.is_empty() => out.extend(t.melt(&single)?),
                    _ => out.extend(zero_fill(&single.keywords, axis)),
                }
            }
            Ok(out)
        }
        RawFrame::Empty => Ok(zero_fill(&batch.keywords, axis)),
    }
}

fn parse_date(cell: &Value) -> Result<NaiveDate, TrendError> {
    match cell {
        Value::String(s) => parse_date_str(s),
        // Epoch milliseconds, as written by table-to-JSON exporters.
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .filter(|d| EPOCH_YEARS.contains(&d.year()))
            .ok_or_else(|| TrendError::parse(format!("invalid epoch-millisecond date {n}"))),
        other => Err(TrendError::parse(format!(
            "expected a date, found {}",
            shape_name(other)
        ))),
    }
}

fn parse_date_str(s: &str) -> Result<NaiveDate, TrendError> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(TrendError::parse(format!("invalid date '{s}'")))
}

fn parse_value(cell: &Value, keyword: &str) -> Result<f64, TrendError> {
    let v = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.ok_or_else(|| {
        TrendError::parse(format!(
            "non-numeric value {} for '{keyword}'",
            shape_name(cell)
        ))
    })
}

const fn shape_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
