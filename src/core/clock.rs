//! Slot-boundary ticker.
//!
//! Tick `i` is due at `start + i * period`. Deadlines are computed from the
//! start instant rather than from the previous tick, so late wakeups do not
//! accumulate drift, and a consumer that stalls past several boundaries gets
//! one tick per missed boundary.

use crossbeam_channel::{at, Receiver};
use std::time::{Duration, Instant};

/// Length of one slot.
pub const SLOT_DURATION: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Ticker {
    start: Instant,
    period: Duration,
    fired: u64,
}

impl Ticker {
    /// Ticker with boundaries every `period`, starting now.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    pub fn starting_at(start: Instant, period: Duration) -> Self {
        Self {
            start,
            period: period.max(Duration::from_millis(1)),
            fired: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of boundaries already consumed.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Instant of the next unconsumed boundary.
    pub fn next_deadline(&self) -> Instant {
        let n = u32::try_from(self.fired + 1).unwrap_or(u32::MAX);
        self.start + self.period.saturating_mul(n)
    }

    /// One-shot channel that delivers at the next boundary.
    pub fn deadline(&self) -> Receiver<Instant> {
        at(self.next_deadline())
    }

    /// Consume the next boundary.
    pub fn mark_fired(&mut self) {
        self.fired += 1;
    }
}
