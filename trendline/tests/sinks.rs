mod helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use helpers::*;
use trendline::sink::{CsvSink, FAILURE_HEADER};
use trendline::{
    FailureSink, InterestRecord, InterestSink, Keyword, TimeUnit, Trendline, aggregate_interest,
    read_failed_keywords, read_interest_csv, timestamped_path,
};
use trendline_mock::{MockConnector, fixture_dates};

fn rec(day: u32, k: &str, v: f64) -> InterestRecord {
    InterestRecord {
        date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
        keyword: k.into(),
        search_interest: v,
    }
}

#[test]
fn header_written_only_when_file_is_created() {
    let out = sinks();
    let sink = InterestSink::new(&out.success);
    assert_eq!(sink.append(&[rec(3, "a", 1.0)]).unwrap(), 1);
    assert_eq!(sink.append(&[rec(10, "a", 2.0), rec(17, "a", 0.0)]).unwrap(), 2);

    let text = lines(&out.success);
    assert_eq!(text[0], "date,keyword,search_interest");
    assert_eq!(text.len(), 4);
    assert_eq!(text.iter().filter(|l| l.starts_with("date,")).count(), 1);
    assert_eq!(text[1], "2021-01-03,a,1.0");

    let back = read_interest_csv(&out.success).unwrap();
    assert_eq!(back, vec![rec(3, "a", 1.0), rec(10, "a", 2.0), rec(17, "a", 0.0)]);
}

#[test]
fn appending_to_a_preexisting_file_adds_no_header() {
    let out = sinks();
    std::fs::create_dir_all(out.success.parent().unwrap()).unwrap();
    std::fs::write(&out.success, "date,keyword,search_interest\n").unwrap();
    InterestSink::new(&out.success).append(&[rec(3, "b", 4.0)]).unwrap();
    assert_eq!(lines(&out.success), vec!["date,keyword,search_interest", "2021-01-03,b,4.0"]);
}

#[test]
fn empty_preexisting_file_gets_a_header() {
    let out = sinks();
    std::fs::create_dir_all(out.success.parent().unwrap()).unwrap();
    std::fs::File::create(&out.success).unwrap();

    let sink = InterestSink::new(&out.success);
    sink.append(&[rec(3, "a", 1.0)]).unwrap();
    sink.append(&[rec(3, "a", 1.0)]).unwrap();

    assert_eq!(
        lines(&out.success),
        vec!["date,keyword,search_interest", "2021-01-03,a,1.0", "2021-01-03,a,1.0"]
    );
    assert_eq!(read_interest_csv(&out.success).unwrap().len(), 2);
}

#[test]
fn failure_sink_is_a_single_unlabeled_column() {
    let out = sinks();
    let sink = FailureSink::new(&out.failure);
    let kws: Vec<Keyword> = ["x", "y, with comma"]
        .iter()
        .map(|s| Keyword::new(s).unwrap())
        .collect();
    sink.append(&kws).unwrap();
    sink.append(&kws[..1]).unwrap();

    assert_eq!(lines(&out.failure), vec![FAILURE_HEADER, "x", "\"y, with comma\"", "x"]);
    let back = read_failed_keywords(&out.failure).unwrap();
    assert_eq!(back, vec![kws[0].clone(), kws[1].clone(), kws[0].clone()]);
}

#[test]
fn empty_append_still_creates_file_with_header() {
    let out = sinks();
    let sink = CsvSink::new(&out.success);
    assert_eq!(sink.append::<[&str; 1], _>(&["h"], []).unwrap(), 0);
    assert_eq!(lines(&out.success), vec!["h"]);
}

#[test]
fn timestamped_paths_carry_stem_and_utc_stamp() {
    let p = timestamped_path("/tmp/out", "interest");
    let name = p.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("interest_"));
    assert!(name.ends_with(".csv"));
    // interest_YYMMDD-HHMMSS.csv
    assert_eq!(name.len(), "interest_".len() + 13 + ".csv".len());
    assert_eq!(p.parent().unwrap(), std::path::Path::new("/tmp/out"));
}

#[tokio::test(start_paused = true)]
async fn rerunning_against_the_same_paths_doubles_rows() {
    let trends = Trendline::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .backoff(fixed_backoff())
        .max_retries(1)
        .build()
        .unwrap();
    let out = sinks();

    for _ in 0..2 {
        trends
            .interest_over_time()
            .keywords(["adidas", "allianz", "FAIL"])
            .success_path(&out.success)
            .failure_path(&out.failure)
            .run()
            .await
            .unwrap();
    }
    let weeks = fixture_dates().len();

    // The single batch holds FAIL and is exhausted both times.
    assert!(!out.success.exists());
    assert_eq!(
        lines(&out.failure),
        vec!["0", "adidas", "allianz", "FAIL", "adidas", "allianz", "FAIL"]
    );

    for _ in 0..2 {
        trends
            .interest_over_time()
            .keywords(["adidas", "allianz"])
            .success_path(&out.success)
            .failure_path(&out.failure)
            .run()
            .await
            .unwrap();
    }
    let rows = read_interest_csv(&out.success).unwrap();
    assert_eq!(rows.len(), 2 * 2 * weeks);
    let header_lines = lines(&out.success)
        .iter()
        .filter(|l| l.starts_with("date,"))
        .count();
    assert_eq!(header_lines, 1);

    let monthly = aggregate_interest(&rows, TimeUnit::Month);
    // Twelve Sundays from 2021-01-03 span January to March.
    assert_eq!(monthly.len(), 2 * 3);
}
