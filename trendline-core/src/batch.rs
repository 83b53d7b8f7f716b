use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::{Keyword, KeywordBatch};

/// Split keywords into consecutive batches of at most `batch_size`.
///
/// Produces `ceil(N / batch_size)` batches. Every batch holds exactly
/// `batch_size` keywords except possibly the last; input order is kept and
/// nothing is dropped or repeated. Batches are indexed from zero.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "trendline_core::split_batches",
        level = "debug",
        skip(keywords),
        fields(keywords = keywords.len(), batch_size = batch_size.get()),
    )
)]
#[must_use]
pub fn split_batches(keywords: &[Keyword], batch_size: NonZeroUsize) -> Vec<KeywordBatch> {
    keywords
        .chunks(batch_size.get())
        .enumerate()
        .map(|(index, chunk)| KeywordBatch::new(index, chunk.to_vec()))
        .collect()
}

/// Remove repeated keywords while keeping the first occurrence of each.
#[must_use]
pub fn dedup_keywords(keywords: Vec<Keyword>) -> Vec<Keyword> {
    let mut seen: HashSet<Keyword> = HashSet::with_capacity(keywords.len());
    keywords
        .into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
