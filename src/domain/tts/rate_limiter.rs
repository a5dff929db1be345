use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Admission limit for calls to the synthesis backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Sliding-window limiter over the instants of admitted calls.
///
/// Timestamps are kept in ascending order; the lock is only held for the
/// purge/check/record sequence.
pub struct SlidingWindowRateLimiter {
    policy: RateLimitPolicy,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            timestamps: Mutex::new(VecDeque::with_capacity(policy.max_requests)),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Admit one call if the window has room, recording its timestamp
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();
        Self::purge(&mut timestamps, now, self.policy.window);

        if timestamps.len() >= self.policy.max_requests {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Number of admitted calls still inside the window
    pub fn in_window(&self) -> usize {
        let mut timestamps = self.timestamps.lock();
        Self::purge(&mut timestamps, Instant::now(), self.policy.window);
        timestamps.len()
    }

    fn purge(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
