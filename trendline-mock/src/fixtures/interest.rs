use chrono::{Duration, NaiveDate};
use serde_json::{Value, json};
use trendline_core::frame::{DATE_COLUMN, PARTIAL_COLUMN};
use trendline_core::{KeywordBatch, RawFrame, WideFrame};

/// Number of weekly points the fixture connector reports.
pub const FIXTURE_WEEKS: usize = 12;

/// `weeks` consecutive Sundays starting at `start`.
#[must_use]
pub fn weekly_dates(start: NaiveDate, weeks: usize) -> Vec<NaiveDate> {
    (0..weeks)
        .map(|i| start + Duration::weeks(i64::try_from(i).unwrap_or(i64::MAX)))
        .collect()
}

/// The fixture axis: twelve Sundays from 2021-01-03.
#[must_use]
pub fn fixture_dates() -> Vec<NaiveDate> {
    NaiveDate::from_ymd_opt(2021, 1, 3)
        .map(|start| weekly_dates(start, FIXTURE_WEEKS))
        .unwrap_or_default()
}

/// Deterministic 0..=100 value for a keyword at a position on the axis.
#[must_use]
pub fn fixture_value(keyword: &str, position: usize) -> u64 {
    let seed: u64 = keyword.bytes().map(u64::from).sum();
    (seed + 7 * position as u64) % 101
}

/// Build a wide table (`date`, one column per keyword, `isPartial`) in the
/// shape the remote returns for a multi-keyword query.
#[must_use]
pub fn interest_table(keywords: &[&str], dates: &[NaiveDate]) -> RawFrame {
    let mut columns = Vec::with_capacity(keywords.len() + 2);
    columns.push(DATE_COLUMN.to_string());
    columns.extend(keywords.iter().map(|k| (*k).to_string()));
    columns.push(PARTIAL_COLUMN.to_string());

    let last = dates.len().saturating_sub(1);
    let rows = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let mut row: Vec<Value> = Vec::with_capacity(columns.len());
            row.push(json!(date.format("%Y-%m-%d").to_string()));
            row.extend(keywords.iter().map(|k| json!(fixture_value(k, i))));
            row.push(json!(i == last));
            row
        })
        .collect();
    RawFrame::Table(WideFrame::new(columns, rows))
}

/// Fixture response for a batch, honoring the sentinel keywords.
pub fn for_batch(batch: &KeywordBatch) -> RawFrame {
    if batch.contains("NODATA") {
        return RawFrame::Empty;
    }
    let labels = batch.labels();
    let keywords: Vec<&str> = labels.iter().map(String::as_str).collect();
    interest_table(&keywords, &fixture_dates())
}
