//! Bounded polling with exponential backoff.
//!
//! Asynchronous UI (search suggestions, expanded biographies) is waited for
//! by re-probing until it appears or the deadline passes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// How long to keep polling and how quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub timeout_ms: u64,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl PollPolicy {
    pub const fn new(timeout_ms: u64, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            timeout_ms,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Poll exactly once.
    pub const fn immediate() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Start a backoff schedule whose deadline is `timeout` from now.
    pub fn start(&self) -> Backoff {
        Backoff {
            deadline: Instant::now() + self.timeout(),
            next: Duration::from_millis(self.initial_backoff_ms.max(1)),
            max: Duration::from_millis(self.max_backoff_ms.max(self.initial_backoff_ms).max(1)),
        }
    }
}

/// Delay schedule for one wait.
#[derive(Debug)]
pub struct Backoff {
    deadline: Instant,
    next: Duration,
    max: Duration,
}

impl Backoff {
    /// Delay before the next poll, or `None` once the deadline has passed.
    ///
    /// Delays double up to the cap and are clipped to the time remaining.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let remaining = self.deadline.checked_duration_since(Instant::now())?;
        if remaining.is_zero() {
            return None;
        }
        let delay = self.next.min(remaining);
        self.next = (self.next * 2).min(self.max);
        Some(delay)
    }

    /// Sleep for the next delay. Returns `false` when the wait is over.
    pub async fn wait(&mut self) -> bool {
        match self.next_delay() {
            Some(d) => {
                tokio::time::sleep(d).await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_immediate_has_no_delay() {
        let mut b = PollPolicy::immediate().start();
        assert!(b.next_delay().is_none());
        assert!(!b.wait().await);
    }

    #[tokio::test]
    async fn test_delays_double_and_cap() {
        let mut b = PollPolicy::new(60_000, 10, 40).start();
        let delays: Vec<_> = (0..5).map(|_| b.next_delay().unwrap()).collect();
        let ms: Vec<u128> = delays.iter().map(|d| d.as_millis()).collect();
        assert_eq!(ms, vec![10, 20, 40, 40, 40]);
    }

    #[tokio::test]
    async fn test_deadline_ends_wait() {
        let policy = PollPolicy::new(30, 10, 10);
        let mut b = policy.start();
        let start = Instant::now();
        let mut sleeps = 0;
        while b.wait().await {
            sleeps += 1;
            assert!(sleeps < 100, "backoff never expired");
        }
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(sleeps >= 1);
    }
}
