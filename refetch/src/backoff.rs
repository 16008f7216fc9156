//! Exponential backoff with optional symmetric jitter.

use rand::Rng;
use refetch_config::FetcherConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base_ms: u64,
    pub max_ms: u64,
    pub jitter: bool,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64, jitter: bool) -> Self {
        Self {
            base_ms,
            max_ms,
            jitter,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.base_backoff_ms, config.max_backoff_ms, config.jitter)
    }

    /// `min(base * 2^(attempt-1), max)` in milliseconds.
    ///
    /// `attempt` is 1-based: 1 is the delay before the second try.
    pub fn capped_ms(&self, attempt: u32) -> u64 {
        let exp = attempt.saturating_sub(1);
        let raw = 2u64
            .checked_pow(exp)
            .map_or(u64::MAX, |factor| self.base_ms.saturating_mul(factor));
        raw.min(self.max_ms)
    }

    /// Delay before the next try, drawing jitter from `rng`.
    pub fn delay_with<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let capped = self.capped_ms(attempt);
        if !self.jitter {
            return Duration::from_millis(capped);
        }

        // +/- 50% jitter
        let factor: f64 = rng.random_range(-0.5..0.5);
        let change = capped as f64 * factor;
        let jittered = (capped as f64 + change).max(0.0).floor();
        Duration::from_millis(jittered as u64)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with(attempt, &mut rand::rng())
    }
}
