use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use trendline_core::BackoffConfig;

use crate::backoff::Backoff;

/// Mutable state owned by the pipeline driver for the length of one run.
///
/// Batches are driven one after another with `&mut RunContext`, so the
/// backoff escalation of one batch carries into the next.
#[derive(Debug)]
pub struct RunContext {
    backoff: Backoff,
    rng: StdRng,
}

impl RunContext {
    /// Context seeded from the thread-local generator, or from `seed` for reproducible pauses.
    #[must_use]
    pub fn new(cfg: BackoffConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            backoff: Backoff::new(cfg),
            rng,
        }
    }

    /// Jittered pause around the current base.
    pub fn draw_pause(&mut self) -> Duration {
        self.backoff.draw(&mut self.rng)
    }

    /// Raise the backoff base after a failed attempt.
    pub fn escalate(&mut self) {
        self.backoff.escalate();
    }

    /// Current backoff base.
    #[must_use]
    pub const fn base_timeout(&self) -> Duration {
        self.backoff.base()
    }
}
