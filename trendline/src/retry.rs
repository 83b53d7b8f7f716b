//! Per-batch retry state machine.
//!
//! The machine is pure: it consumes events and emits actions. Querying,
//! persisting, pausing and escalating the shared backoff are performed by the
//! driver in [`drive_batch`].

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use trendline_core::{
    BatchReport, BatchStatus, KeywordBatch, PauseCause, PauseRecord, QueryOutcome, TrendError,
};

use crate::context::RunContext;

/// Lifecycle of one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Waiting for the next attempt.
    Pending {
        /// Attempts made so far.
        attempt: u32,
    },
    /// A query is in flight; `pause` follows its outcome.
    Attempting {
        /// 1-based attempt number.
        attempt: u32,
        /// Pause drawn before the attempt started.
        pause: Duration,
    },
    /// A query succeeded.
    Succeeded {
        /// Attempts used.
        attempts: u32,
    },
    /// Every attempt failed.
    Exhausted {
        /// Attempts used.
        attempts: u32,
        /// Error of the final attempt.
        last_error: TrendError,
    },
}

/// Input to [`RetryMachine::handle`].
#[derive(Debug)]
pub enum Event<T> {
    /// Start the next attempt with a pause drawn from the current backoff base.
    Begin {
        /// Pause to take after this attempt's outcome.
        pause: Duration,
    },
    /// Result of the in-flight query.
    Outcome(QueryOutcome<T>),
}

/// Side effect requested by the machine, executed in order by the driver.
#[derive(Debug, PartialEq)]
pub enum Action<T> {
    /// Issue the next query.
    Query {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// Append the payload to the success sink.
    Persist(T),
    /// Append the batch keywords to the failure sink.
    RecordFailure,
    /// Raise the shared backoff base.
    EscalateBackoff,
    /// Sleep before the next remote call.
    Pause {
        /// Sleep length.
        duration: Duration,
        /// What triggered the pause.
        cause: PauseCause,
    },
}

/// Retry state machine for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryMachine {
    max_retries: NonZeroU32,
    phase: Phase,
}

impl RetryMachine {
    /// Fresh machine allowing `max_retries` attempts.
    #[must_use]
    pub const fn new(max_retries: NonZeroU32) -> Self {
        Self {
            max_retries,
            phase: Phase::Pending { attempt: 0 },
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the batch has succeeded or exhausted its attempts.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            Phase::Succeeded { .. } | Phase::Exhausted { .. }
        )
    }

    /// Apply one event, returning the next machine and the actions to execute.
    pub fn handle<T>(self, event: Event<T>) -> (Self, Vec<Action<T>>) {
        let Self { max_retries, phase } = self;
        match (phase, event) {
            (Phase::Pending { attempt }, Event::Begin { pause }) => {
                let attempt = attempt + 1;
                (
                    Self {
                        max_retries,
                        phase: Phase::Attempting { attempt, pause },
                    },
                    vec![Action::Query { attempt }],
                )
            }
            (Phase::Attempting { attempt, pause }, Event::Outcome(QueryOutcome::Success(data))) => (
                Self {
                    max_retries,
                    phase: Phase::Succeeded { attempts: attempt },
                },
                vec![
                    Action::Persist(data),
                    Action::Pause {
                        duration: pause,
                        cause: PauseCause::AfterSuccess,
                    },
                ],
            ),
            (Phase::Attempting { attempt, pause }, Event::Outcome(QueryOutcome::Failure(e))) => {
                let mut actions = vec![Action::EscalateBackoff];
                let phase = if attempt >= max_retries.get() {
                    actions.push(Action::RecordFailure);
                    Phase::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    }
                } else {
                    Phase::Pending { attempt }
                };
                actions.push(Action::Pause {
                    duration: pause,
                    cause: PauseCause::AfterFailure,
                });
                (Self { max_retries, phase }, actions)
            }
            // Out-of-order events leave the machine untouched.
            (phase, _) => (Self { max_retries, phase }, Vec::new()),
        }
    }
}

/// One batch worth of remote work, driven by [`drive_batch`].
#[async_trait]
pub trait BatchJob: Send {
    /// Payload of a successful attempt.
    type Output: Send;

    /// Perform one attempt against the remote.
    async fn query(&mut self, attempt: u32) -> QueryOutcome<Self::Output>;

    /// Append a successful payload to the success sink; returns rows written.
    fn persist(&mut self, output: Self::Output) -> Result<usize, TrendError>;

    /// Append the batch keywords to the failure sink.
    fn record_failure(&mut self) -> Result<(), TrendError>;
}

/// Run `job` through the retry machine until it succeeds or exhausts.
///
/// Sink errors abort immediately; query errors only drive retries.
pub async fn drive_batch<J: BatchJob>(
    job: &mut J,
    batch: &KeywordBatch,
    max_retries: NonZeroU32,
    ctx: &mut RunContext,
) -> Result<BatchReport, TrendError> {
    let mut machine = RetryMachine::new(max_retries);
    let mut event = Event::Begin {
        pause: ctx.draw_pause(),
    };
    let mut rows_written = 0;
    let mut pauses = Vec::new();

    loop {
        let (next, actions) = machine.handle(event);
        machine = next;
        let mut outcome = None;

        for action in actions {
            match action {
                Action::Query { attempt } => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        batch = batch.index,
                        attempt,
                        keywords = ?batch.labels(),
                        "querying batch"
                    );
                    let result = job.query(attempt).await;
                    #[cfg(feature = "tracing")]
                    {
                        if let QueryOutcome::Failure(e) = &result {
                            tracing::warn!(
                                batch = batch.index,
                                attempt,
                                error = %e,
                                "attempt failed"
                            );
                        }
                    }
                    outcome = Some(result);
                }
                Action::Persist(output) => rows_written += job.persist(output)?,
                Action::RecordFailure => job.record_failure()?,
                Action::EscalateBackoff => ctx.escalate(),
                Action::Pause { duration, cause } => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        batch = batch.index,
                        pause_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                        ?cause,
                        "pausing"
                    );
                    tokio::time::sleep(duration).await;
                    pauses.push(PauseRecord { duration, cause });
                }
            }
        }

        event = match (machine.phase(), outcome) {
            (Phase::Succeeded { attempts }, _) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    batch = batch.index,
                    attempts,
                    rows = rows_written,
                    "batch succeeded"
                );
                return Ok(BatchReport {
                    index: batch.index,
                    keywords: batch.labels(),
                    attempts: *attempts,
                    rows_written,
                    pauses,
                    status: BatchStatus::Succeeded,
                });
            }
            (Phase::Exhausted { attempts, last_error }, _) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    batch = batch.index,
                    attempts,
                    keywords = ?batch.labels(),
                    error = %last_error,
                    "batch exhausted; recorded to failure sink"
                );
                return Ok(BatchReport {
                    index: batch.index,
                    keywords: batch.labels(),
                    attempts: *attempts,
                    rows_written,
                    pauses,
                    status: BatchStatus::Exhausted {
                        last_error: last_error.clone(),
                    },
                });
            }
            (Phase::Pending { .. }, _) => Event::Begin {
                pause: ctx.draw_pause(),
            },
            (Phase::Attempting { .. }, Some(outcome)) => Event::Outcome(outcome),
            (Phase::Attempting { .. }, None) => {
                return Err(TrendError::Other(
                    "retry machine stalled without a query outcome".into(),
                ));
            }
        };
    }
}
