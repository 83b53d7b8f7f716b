use std::time::Duration;

use rand::Rng;
use trendline_core::BackoffConfig;

/// Escalating, jittered pause state shared by every batch of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    increment: Duration,
    jitter: Duration,
}

impl Backoff {
    /// Start from the configured base.
    #[must_use]
    pub const fn new(cfg: BackoffConfig) -> Self {
        Self {
            base: cfg.base_timeout,
            increment: cfg.increment,
            jitter: cfg.jitter,
        }
    }

    /// Current base pause.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Uniform whole-second draw from `[base - jitter, base + jitter]`, saturating at zero.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(jitter_wait(
            self.base.as_secs(),
            self.jitter.as_secs(),
            rng,
        ))
    }

    /// Raise the base by one increment. Never reset within a run.
    pub fn escalate(&mut self) {
        self.base = self.base.saturating_add(self.increment);
    }
}

/// Whole seconds drawn uniformly from `[base - jitter, base + jitter]`, floored at zero.
pub fn jitter_wait<R: Rng>(base_secs: u64, jitter_secs: u64, rng: &mut R) -> u64 {
    let lo = base_secs.saturating_sub(jitter_secs);
    let hi = base_secs.saturating_add(jitter_secs);
    rng.random_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cfg(base: u64) -> BackoffConfig {
        BackoffConfig {
            base_timeout: Duration::from_secs(base),
            ..BackoffConfig::default()
        }
    }

    #[test]
    fn draws_stay_inside_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let b = Backoff::new(cfg(10));
        for _ in 0..500 {
            let d = b.draw(&mut rng).as_secs();
            assert!((7..=13).contains(&d), "{d}");
        }
    }

    #[test]
    fn window_saturates_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = Backoff::new(cfg(1));
        for _ in 0..200 {
            assert!(b.draw(&mut rng).as_secs() <= 4);
        }
    }

    #[test]
    fn escalation_accumulates() {
        let mut b = Backoff::new(cfg(10));
        b.escalate();
        b.escalate();
        assert_eq!(b.base(), Duration::from_secs(16));
    }
}
