use chrono::NaiveDate;
use serde_json::json;
use trendline_core::{
    Keyword, KeywordBatch, RawFrame, ReferenceAxis, TrendError, WideFrame, normalize_frame,
};

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, m, day).unwrap()
}

fn batch(raw: &[&str]) -> KeywordBatch {
    KeywordBatch::new(0, raw.iter().map(|s| Keyword::new(s).unwrap()).collect())
}

fn axis() -> ReferenceAxis {
    ReferenceAxis::new(vec![d(1, 3), d(1, 10), d(1, 17)]).unwrap()
}

fn table() -> RawFrame {
    RawFrame::Table(WideFrame::new(
        vec!["date".into(), "adidas".into(), "allianz".into(), "isPartial".into()],
        vec![
            vec![json!("2021-01-03"), json!(10), json!(0), json!(false)],
            vec![json!("2021-01-10"), json!(55), json!(3), json!(false)],
            vec![json!("2021-01-17"), json!(100), json!(7), json!(true)],
        ],
    ))
}

#[test]
fn table_is_melted_keyword_major_without_marker_column() {
    let rows = normalize_frame(&table(), &batch(&["adidas", "allianz"]), &axis()).unwrap();
    assert_eq!(rows.len(), 6);
    let flat: Vec<(NaiveDate, &str, f64)> = rows
        .iter()
        .map(|r| (r.date, r.keyword.as_str(), r.search_interest))
        .collect();
    assert_eq!(
        flat,
        vec![
            (d(1, 3), "adidas", 10.0),
            (d(1, 10), "adidas", 55.0),
            (d(1, 17), "adidas", 100.0),
            (d(1, 3), "allianz", 0.0),
            (d(1, 10), "allianz", 3.0),
            (d(1, 17), "allianz", 7.0),
        ]
    );
    assert!(rows.iter().all(|r| r.keyword != "isPartial"));
}

#[test]
fn empty_shapes_expand_to_zero_rows_on_axis() {
    let b = batch(&["adidas manipulation", "adidas dispute"]);
    for frame in [
        RawFrame::Empty,
        RawFrame::Table(WideFrame::new(vec!["date".into()], vec![])),
        RawFrame::from_json(json!({})).unwrap(),
        RawFrame::from_json(json!(null)).unwrap(),
    ] {
        let rows = normalize_frame(&frame, &b, &axis()).unwrap();
        assert_eq!(rows.len(), 3 * 2);
        assert!(rows.iter().all(|r| r.search_interest == 0.0));
        assert_eq!(rows[0].keyword, "adidas manipulation");
        assert_eq!(rows[3].keyword, "adidas dispute");
        assert_eq!(rows[5].date, d(1, 17));
    }
}

#[test]
fn per_keyword_shape_zero_fills_missing_keywords() {
    let frame = RawFrame::from_json(json!({
        "adidas": {
            "columns": ["date", "adidas", "isPartial"],
            "rows": [["2021-01-03", 4, false], ["2021-01-10", 5, false], ["2021-01-17", 6, true]]
        }
    }))
    .unwrap();
    assert!(matches!(frame, RawFrame::PerKeyword(_)));

    let rows = normalize_frame(&frame, &batch(&["adidas", "allianz"]), &axis()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[2].search_interest, 6.0);
    assert!(rows[3..].iter().all(|r| r.keyword == "allianz" && r.search_interest == 0.0));
}

#[test]
fn unexpected_shapes_fail_fast() {
    let b = batch(&["adidas"]);

    let no_date = RawFrame::Table(WideFrame::new(
        vec!["adidas".into()],
        vec![vec![json!(1)]],
    ));
    assert!(matches!(normalize_frame(&no_date, &b, &axis()), Err(TrendError::Parse(_))));

    let stranger = RawFrame::Table(WideFrame::new(
        vec!["date".into(), "adidas".into(), "puma".into()],
        vec![vec![json!("2021-01-03"), json!(1), json!(2)]],
    ));
    assert!(matches!(normalize_frame(&stranger, &b, &axis()), Err(TrendError::Parse(_))));

    let missing = RawFrame::Table(WideFrame::new(
        vec!["date".into(), "isPartial".into()],
        vec![vec![json!("2021-01-03"), json!(false)]],
    ));
    assert!(matches!(normalize_frame(&missing, &b, &axis()), Err(TrendError::Parse(_))));

    let negative = RawFrame::Table(WideFrame::new(
        vec!["date".into(), "adidas".into()],
        vec![vec![json!("2021-01-03"), json!(-1)]],
    ));
    assert!(matches!(normalize_frame(&negative, &b, &axis()), Err(TrendError::Parse(_))));

    let ragged = RawFrame::Table(WideFrame::new(
        vec!["date".into(), "adidas".into()],
        vec![vec![json!("2021-01-03")]],
    ));
    assert!(matches!(normalize_frame(&ragged, &b, &axis()), Err(TrendError::Parse(_))));

    assert!(matches!(RawFrame::from_json(json!(42)), Err(TrendError::Parse(_))));
    assert!(matches!(
        RawFrame::from_json(json!({"adidas": [1, 2]})),
        Err(TrendError::Parse(_))
    ));
}

#[test]
fn date_column_reads_anchor_dates() {
    assert_eq!(table().date_column().unwrap(), vec![d(1, 3), d(1, 10), d(1, 17)]);
    assert!(matches!(RawFrame::Empty.date_column(), Err(TrendError::Parse(_))));
}
