//! Related-queries responses and their flattening into sink rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{KeywordBatch, Ranking, RelatedQuery, RelatedQueryRecord};

/// Top and rising lists for one keyword. `None` means the remote omitted the list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedQueries {
    /// Most popular related queries.
    pub top: Option<Vec<RelatedQuery>>,
    /// Fastest-growing related queries.
    pub rising: Option<Vec<RelatedQuery>>,
}

impl RankedQueries {
    /// The list for `ranking`, if present.
    #[must_use]
    pub fn get(&self, ranking: Ranking) -> Option<&[RelatedQuery]> {
        match ranking {
            Ranking::Top => self.top.as_deref(),
            Ranking::Rising => self.rising.as_deref(),
        }
    }
}

/// Related queries keyed by keyword.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelatedQueriesResponse {
    /// Lists per keyword.
    pub by_keyword: HashMap<String, RankedQueries>,
}

/// Rows produced from a response plus the (keyword, ranking) pairs it lacked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenedRelated {
    /// One row per (ranking, keyword, query), ranking-major.
    pub records: Vec<RelatedQueryRecord>,
    /// Lists the remote did not return.
    pub missing: Vec<(String, Ranking)>,
}

/// Flatten a response into sink rows for the keywords of `batch`.
///
/// Rows are emitted ranking-major (all top lists, then all rising lists) in
/// batch keyword order. `geo` and `query_timestamp` are stamped on every row.
#[must_use]
pub fn flatten_related(
    response: &RelatedQueriesResponse,
    batch: &KeywordBatch,
    geo: &str,
    query_timestamp: &str,
) -> FlattenedRelated {
    let mut out = FlattenedRelated::default();
    for ranking in [Ranking::Top, Ranking::Rising] {
        for keyword in &batch.keywords {
            let list = response
                .by_keyword
                .get(keyword.as_str())
                .and_then(|r| r.get(ranking));
            let Some(list) = list else {
                out.missing.push((keyword.to_string(), ranking));
                continue;
            };
            out.records.extend(list.iter().map(|q| RelatedQueryRecord {
                query: q.query.clone(),
                value: q.value,
                keyword: keyword.to_string(),
                ranking,
                geo: geo.to_string(),
                query_timestamp: query_timestamp.to_string(),
            }));
        }
    }
    out
}
