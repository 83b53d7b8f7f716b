use trendline_core::{KeywordBatch, RankedQueries, RelatedQueriesResponse, RelatedQuery};

pub fn for_batch(batch: &KeywordBatch) -> RelatedQueriesResponse {
    let by_keyword = batch
        .keywords
        .iter()
        .filter(|k| k.as_str() != "NODATA")
        .map(|k| {
            let top = (1..=3u8)
                .map(|i| RelatedQuery {
                    query: format!("{k} top {i}"),
                    value: 100.0 - 10.0 * f64::from(i),
                })
                .collect();
            let rising = vec![RelatedQuery {
                query: format!("{k} news"),
                value: 250.0,
            }];
            (
                k.to_string(),
                RankedQueries {
                    top: Some(top),
                    rising: Some(rising),
                },
            )
        })
        .collect();
    RelatedQueriesResponse { by_keyword }
}
