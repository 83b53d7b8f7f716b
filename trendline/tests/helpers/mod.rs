// Shared fixtures for the pipeline tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use trendline::{BackoffConfig, RawFrame, TrendConnector, TrendError, Trendline, TrendlineBuilder};
use trendline_mock::{DynamicMockController, MockBehavior, fixture_dates, interest_table};

pub const ANCHOR: [&str; 2] = ["pizza", "lufthansa"];

/// Backoff without jitter so pause lengths are exact: 10s base, +3s per failure.
pub const fn fixed_backoff() -> BackoffConfig {
    BackoffConfig {
        base_timeout: Duration::from_secs(10),
        increment: Duration::from_secs(3),
        jitter: Duration::ZERO,
    }
}

pub fn builder(connector: Arc<dyn TrendConnector>) -> TrendlineBuilder {
    Trendline::builder()
        .with_connector(connector)
        .backoff(fixed_backoff())
        .jitter_seed(7)
}

pub fn table(keywords: &[&str]) -> RawFrame {
    interest_table(keywords, &fixture_dates())
}

pub fn throttled() -> TrendError {
    TrendError::connector("dyn", "429 Too Many Requests")
}

/// Script the anchor query to succeed once.
pub async fn script_anchor(ctl: &DynamicMockController) {
    ctl.push_interest_behavior(ANCHOR[0], MockBehavior::Return(table(&ANCHOR)))
        .await;
}

pub struct Sinks {
    _dir: tempfile::TempDir,
    pub success: PathBuf,
    pub failure: PathBuf,
}

pub fn sinks() -> Sinks {
    let dir = tempfile::tempdir().expect("tempdir");
    let success = dir.path().join("out").join("interest.csv");
    let failure = dir.path().join("out").join("failed.csv");
    Sinks {
        _dir: dir,
        success,
        failure,
    }
}

pub fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read sink")
        .lines()
        .map(ToString::to_string)
        .collect()
}
