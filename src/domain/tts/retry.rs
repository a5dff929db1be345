use std::time::Duration;

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(2),
            backoff_factor: 3.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before the `n`th wait (1-based): `initial_delay * backoff_factor^(n-1)`
    pub fn delay_for(&self, n: u32) -> Duration {
        let exponent = n.saturating_sub(1) as i32;
        self.initial_delay
            .mul_f64(self.backoff_factor.powi(exponent))
    }
}

/// Per-request retry bookkeeping. Rate-limit waits and failure retries share
/// the same growing delay; only failures consume attempts.
#[derive(Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
    delay: Duration,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            delay: policy.initial_delay,
        }
    }

    /// Start the next attempt, returning its 1-based number
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn attempts_remaining(&self) -> bool {
        self.attempt < self.policy.max_attempts
    }

    /// Current delay; the stored delay grows by the backoff factor
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        self.delay = self.delay.mul_f64(self.policy.backoff_factor);
        delay
    }

    /// Like `next_delay`, but never returns more than `cap`. The stored delay
    /// restarts from `cap`, so repeated capped waits stay bounded.
    pub fn next_delay_capped(&mut self, cap: Duration) -> Duration {
        let delay = self.delay.min(cap);
        self.delay = delay.mul_f64(self.policy.backoff_factor);
        delay
    }
}
