//! Configuration types shared by the orchestrator and its pipelines.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Keyword limit per remote call documented by the search-interest API.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Keyword pair that reliably returns data for any timeframe.
pub const DEFAULT_ANCHOR_KEYWORDS: [&str; 2] = ["pizza", "lufthansa"];

/// Escalating backoff applied between query attempts.
///
/// Each attempt pauses for a uniform whole-second draw from
/// `[base_timeout - jitter, base_timeout + jitter]`. Every failed attempt
/// raises `base_timeout` by `increment` for the remainder of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Starting pause length.
    pub base_timeout: Duration,
    /// Amount added to the base after each failed attempt.
    pub increment: Duration,
    /// Half-width of the uniform jitter window.
    pub jitter: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_timeout: Duration::from_secs(10),
            increment: Duration::from_secs(3),
            jitter: Duration::from_secs(3),
        }
    }
}

/// Global configuration for a `Trendline` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Keywords per remote call.
    pub batch_size: NonZeroUsize,
    /// Attempts per batch before it is recorded as exhausted (>= 1).
    pub max_retries: u32,
    /// Pause and escalation policy.
    pub backoff: BackoffConfig,
    /// Upper bound for a single connector call; exceeding it counts as a failed attempt.
    pub provider_timeout: Duration,
    /// Keywords for the anchor query that yields the reference date axis.
    pub anchor_keywords: Vec<String>,
    /// Drop repeated keywords (first occurrence wins) before batching.
    pub dedup_keywords: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            max_retries: 3,
            backoff: BackoffConfig::default(),
            provider_timeout: Duration::from_secs(60),
            anchor_keywords: DEFAULT_ANCHOR_KEYWORDS.iter().map(ToString::to_string).collect(),
            dedup_keywords: false,
        }
    }
}
