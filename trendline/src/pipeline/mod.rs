pub mod interest;
pub mod related;

use trendline_core::{Keyword, TrendError, dedup_keywords, parse_keywords};

/// Validate raw keyword input and apply the optional de-duplication.
pub(crate) fn prepare_keywords(raw: &[String], dedup: bool) -> Result<Vec<Keyword>, TrendError> {
    if raw.is_empty() {
        return Err(TrendError::InvalidArg("no keywords specified".into()));
    }
    let keywords = parse_keywords(raw)?;
    Ok(if dedup {
        dedup_keywords(keywords)
    } else {
        keywords
    })
}
