use crate::{InterestRecord, Keyword, ReferenceAxis};

/// Materialize an all-zero series for each keyword on the reference axis.
///
/// Output is keyword-major: every axis date for the first keyword, then the
/// next. Yields exactly `axis.len() * keywords.len()` records.
#[must_use]
pub fn zero_fill(keywords: &[Keyword], axis: &ReferenceAxis) -> Vec<InterestRecord> {
    keywords
        .iter()
        .flat_map(|k| axis.dates().iter().map(move |d| InterestRecord::zero(*d, k)))
        .collect()
}
