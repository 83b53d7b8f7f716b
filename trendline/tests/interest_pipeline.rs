mod helpers;

use std::time::Duration;

use helpers::*;
use trendline::{BatchStatus, PauseCause, RawFrame, TrendError, read_interest_csv};
use trendline_mock::{DynamicMockConnector, MockBehavior, fixture_dates};

const SIX: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

#[tokio::test(start_paused = true)]
async fn transient_failure_is_retried_and_both_batches_land_in_success_sink() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.push_interest_behavior("a", MockBehavior::Fail(throttled()))
        .await;
    ctl.push_interest_behavior("a", MockBehavior::Return(table(&SIX[..5])))
        .await;
    ctl.push_interest_behavior("f", MockBehavior::Return(table(&["f"])))
        .await;

    let trends = builder(mock).build().unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(SIX)
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .expect("run ok");

    let sizes: Vec<usize> = report.batches.iter().map(|b| b.keywords.len()).collect();
    assert_eq!(sizes, vec![5, 1]);
    assert_eq!(report.batches[0].attempts, 2);
    assert_eq!(report.batches[1].attempts, 1);
    assert_eq!(report.failure_pauses(), 1);
    assert_eq!(report.exhausted().count(), 0);

    let weeks = fixture_dates().len();
    assert_eq!(report.rows_written(), 6 * weeks);
    let rows = read_interest_csv(&out.success).unwrap();
    assert_eq!(rows.len(), 6 * weeks);
    assert_eq!(rows[0].keyword, "a");
    assert_eq!(rows.last().unwrap().keyword, "f");
    assert!(!out.failure.exists());

    assert_eq!(
        ctl.interest_calls().await,
        vec![
            vec!["pizza".to_string(), "lufthansa".to_string()],
            SIX[..5].iter().map(ToString::to_string).collect(),
            SIX[..5].iter().map(ToString::to_string).collect(),
            vec!["f".to_string()],
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn always_failing_batch_is_exhausted_after_max_retries() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.set_interest_fallback(MockBehavior::Fail(throttled())).await;

    let trends = builder(mock).max_retries(2).build().unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(["adidas manipulation", "adidas dispute"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .expect("exhaustion is not fatal");

    assert_eq!(report.total_attempts(), 2);
    let batch = &report.batches[0];
    assert_eq!(
        batch.status,
        BatchStatus::Exhausted {
            last_error: throttled()
        }
    );
    assert_eq!(
        lines(&out.failure),
        vec!["0", "adidas manipulation", "adidas dispute"]
    );
    assert!(!out.success.exists());
    // anchor + two attempts
    assert_eq!(ctl.interest_calls().await.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn escalation_carries_across_batches() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.push_interest_behavior("a", MockBehavior::Fail(throttled()))
        .await;
    ctl.push_interest_behavior("a", MockBehavior::Fail(throttled()))
        .await;
    ctl.push_interest_behavior("a", MockBehavior::Return(table(&SIX[..5])))
        .await;
    ctl.push_interest_behavior("f", MockBehavior::Return(table(&["f"])))
        .await;

    let trends = builder(mock).build().unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(SIX)
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    let pauses: Vec<(u64, PauseCause)> = report
        .batches
        .iter()
        .flat_map(|b| b.pauses.iter().map(|p| (p.duration.as_secs(), p.cause)))
        .collect();
    assert_eq!(
        pauses,
        vec![
            (10, PauseCause::AfterFailure),
            (13, PauseCause::AfterFailure),
            (16, PauseCause::AfterSuccess),
            (16, PauseCause::AfterSuccess),
        ]
    );
    assert_eq!(report.final_base_timeout, Duration::from_secs(16));
}

#[tokio::test(start_paused = true)]
async fn jittered_pauses_stay_within_three_seconds_of_base() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.set_interest_fallback(MockBehavior::Fail(throttled())).await;

    let trends = trendline::Trendline::builder()
        .with_connector(mock)
        .max_retries(4)
        .jitter_seed(2024)
        .build()
        .unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(["a"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    let pauses = &report.batches[0].pauses;
    assert_eq!(pauses.len(), 4);
    for (i, p) in pauses.iter().enumerate() {
        let base = 10 + 3 * i as u64;
        let secs = p.duration.as_secs();
        assert!((base - 3..=base + 3).contains(&secs), "pause {i}: {secs}s around {base}s");
    }
}

#[tokio::test(start_paused = true)]
async fn degenerate_result_is_zero_filled_on_the_reference_axis() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.push_interest_behavior("obscure", MockBehavior::Return(RawFrame::Empty))
        .await;

    let trends = builder(mock).build().unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(["obscure", "rare"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    assert_eq!(report.batches[0].attempts, 1);
    let rows = read_interest_csv(&out.success).unwrap();
    let axis = fixture_dates();
    assert_eq!(rows.len(), 2 * axis.len());
    assert!(rows.iter().all(|r| r.search_interest == 0.0));
    let dates: Vec<_> = rows[..axis.len()].iter().map(|r| r.date).collect();
    assert_eq!(dates, axis);
}

#[tokio::test(start_paused = true)]
async fn malformed_response_and_timeouts_count_as_failed_attempts() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    // Missing the "b" column.
    ctl.push_interest_behavior("a", MockBehavior::Return(table(&["a"])))
        .await;
    ctl.push_interest_behavior("a", MockBehavior::Hang).await;
    ctl.push_interest_behavior("a", MockBehavior::Return(table(&["a", "b"])))
        .await;

    let trends = builder(mock)
        .provider_timeout(Duration::from_secs(30))
        .build()
        .unwrap();
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(["a", "b"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    assert_eq!(report.batches[0].attempts, 3);
    assert_eq!(report.batches[0].status, BatchStatus::Succeeded);
}

#[tokio::test(start_paused = true)]
async fn anchor_failure_aborts_before_any_batch() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.push_interest_behavior("pizza", MockBehavior::Fail(throttled()))
        .await;
    ctl.set_interest_fallback(MockBehavior::Return(table(&["a"])))
        .await;

    let trends = builder(mock).build().unwrap();
    let out = sinks();
    let err = trends
        .interest_over_time()
        .keywords(["a"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .expect_err("axis failure is fatal");

    assert_eq!(err, TrendError::reference_axis(throttled()));
    assert!(err.is_fatal());
    assert_eq!(ctl.interest_calls().await.len(), 1);
    assert!(!out.success.exists());
    assert!(!out.failure.exists());
}

#[tokio::test(start_paused = true)]
async fn empty_anchor_response_is_fatal() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.push_interest_behavior("pizza", MockBehavior::Return(RawFrame::Empty))
        .await;

    let trends = builder(mock).build().unwrap();
    let out = sinks();
    let err = trends
        .interest_over_time()
        .keywords(["a"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, TrendError::ReferenceAxis(_)));
}

#[tokio::test(start_paused = true)]
async fn dedup_flag_collapses_repeated_keywords() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.set_interest_fallback(MockBehavior::Return(table(&["a", "b"])))
        .await;

    let trends = builder(mock).dedup_keywords(true).build().unwrap();
    let out = sinks();
    trends
        .interest_over_time()
        .keywords(["a", "a", "b"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();
    assert_eq!(
        ctl.interest_calls().await[1],
        vec!["a".to_string(), "b".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn duplicates_are_queried_and_written_independently_by_default() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.set_interest_fallback(MockBehavior::Return(table(&["a", "b"])))
        .await;

    let trends = builder(mock).build().unwrap();
    assert!(!trends.config().dedup_keywords);
    let out = sinks();
    let report = trends
        .interest_over_time()
        .keywords(["a", "a", "b"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    assert_eq!(
        ctl.interest_calls().await[1],
        vec!["a".to_string(), "a".to_string(), "b".to_string()]
    );
    let weeks = fixture_dates().len();
    assert_eq!(report.rows_written(), 3 * weeks);
    let rows = read_interest_csv(&out.success).unwrap();
    assert_eq!(rows.len(), 3 * weeks);
    let per_keyword: Vec<&str> = rows
        .chunks(weeks)
        .map(|chunk| chunk[0].keyword.as_str())
        .collect();
    assert_eq!(per_keyword, vec!["a", "a", "b"]);
    assert_eq!(rows[..weeks], rows[weeks..2 * weeks]);
}

#[tokio::test(start_paused = true)]
async fn surrounding_whitespace_is_trimmed_before_querying_and_recording() {
    let (mock, ctl) = DynamicMockConnector::new_with_controller("dyn");
    script_anchor(&ctl).await;
    ctl.set_interest_fallback(MockBehavior::Fail(throttled())).await;

    let trends = builder(mock).max_retries(1).build().unwrap();
    let out = sinks();
    trends
        .interest_over_time()
        .keywords(["  adidas dispute ", "basf"])
        .success_path(&out.success)
        .failure_path(&out.failure)
        .run()
        .await
        .unwrap();

    assert_eq!(
        ctl.interest_calls().await[1],
        vec!["adidas dispute".to_string(), "basf".to_string()]
    );
    assert_eq!(lines(&out.failure), vec!["0", "adidas dispute", "basf"]);
}
