//! Exponential backoff and the per-run retry state machine.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ request ┌────────────┐ success ┌───────────┐
//! │ Idle ├────────►│ Attempting ├────────►│ Succeeded │──► next page (Attempting)
//! └──────┘         └─┬────────▲─┘         └───────────┘
//!                    │failure │ wait elapsed
//!                    ▼        │
//!               retries < max ┌─────────┐
//!                    ├───────►│ Backoff │
//!                    │        └─────────┘
//!                    │ retries == max
//!                    ▼
//!               ┌────────┐
//!               │ Failed │
//!               └────────┘
//! ```
//!
//! The retry counter counts *consecutive* failures: any success resets it.

use std::time::Duration;

/// Wait before the next attempt after `retry_count` consecutive failures.
///
/// `min(base_ms * 2^retry_count, cap_ms)`, saturating instead of overflowing.
pub fn backoff_delay(retry_count: u32, base_ms: u64, cap_ms: u64) -> Duration {
    let multiplier = 1u64.checked_shl(retry_count.min(63)).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(multiplier).min(cap_ms))
}

/// Where the client is in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No request issued yet.
    #[default]
    Idle,
    /// A page request is in flight.
    Attempting,
    /// Waiting out a backoff before retrying the same page.
    Backoff,
    /// Retry budget exhausted; the run is over.
    Failed,
    /// The last page request succeeded.
    Succeeded,
}

/// Outcome of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep this long, then retry the same page.
    Wait(Duration),
    /// Stop: `attempts` consecutive failures hit the limit.
    GiveUp { attempts: u32 },
}

/// Retry bookkeeping for one run.
#[derive(Debug, Clone)]
pub struct RetryState {
    max_retries: u32,
    base_ms: u64,
    cap_ms: u64,
    retry_count: u32,
    total_failures: u32,
    state: FetchState,
}

impl RetryState {
    pub fn new(max_retries: u32, base_ms: u64, cap_ms: u64) -> Self {
        Self {
            max_retries,
            base_ms,
            cap_ms,
            retry_count: 0,
            total_failures: 0,
            state: FetchState::Idle,
        }
    }

    /// Mark a request as in flight.
    pub fn begin_attempt(&mut self) {
        self.state = FetchState::Attempting;
    }

    /// Record a successful request. Resets the consecutive-failure count.
    pub fn record_success(&mut self) {
        self.retry_count = 0;
        self.state = FetchState::Succeeded;
    }

    /// Record a failed request and decide what happens next.
    pub fn record_failure(&mut self) -> RetryDecision {
        self.retry_count = self.retry_count.saturating_add(1);
        self.total_failures = self.total_failures.saturating_add(1);

        if self.retry_count >= self.max_retries {
            self.state = FetchState::Failed;
            return RetryDecision::GiveUp {
                attempts: self.retry_count,
            };
        }

        self.state = FetchState::Backoff;
        RetryDecision::Wait(backoff_delay(self.retry_count, self.base_ms, self.cap_ms))
    }

    /// Consecutive failures since the last success.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// All failures in this run, including recovered ones.
    pub fn total_failures(&self) -> u32 {
        self.total_failures
    }

    pub fn state(&self) -> FetchState {
        self.state
    }
}
