//! Intake counters for the running session.
//!
//! Counts what happened to every event the feed produced, so dropped and
//! filtered records are visible without keeping the records themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lock-free counters shared between the feed thread and the controller.
#[derive(Debug)]
pub struct IntakeStats {
    /// Records appended to the window
    records_accepted: AtomicU64,
    /// Records rejected by the keyword or language filter
    records_filtered: AtomicU64,
    /// Records that failed extraction
    records_dropped: AtomicU64,
    /// Events dropped because the feed channel was full
    channel_overflows: AtomicU64,
    /// Errors reported by the source
    source_errors: AtomicU64,
    /// Report cycles completed
    cycles_completed: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl IntakeStats {
    pub fn new() -> Self {
        Self {
            records_accepted: AtomicU64::new(0),
            records_filtered: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            channel_overflows: AtomicU64::new(0),
            source_errors: AtomicU64::new(0),
            cycles_completed: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    pub fn record_accepted(&self) {
        self.records_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.records_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow(&self) {
        self.channel_overflows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_error(&self) {
        self.source_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle_completed(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            records_filtered: self.records_filtered.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            channel_overflows: self.channel_overflows.load(Ordering::Relaxed),
            source_errors: self.source_errors.load(Ordering::Relaxed),
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Records accepted: {}\n\
             - Records filtered out: {}\n\
             - Records dropped (malformed): {}\n\
             - Channel overflows: {}\n\
             - Source errors: {}\n\
             - Report cycles: {}\n\
             - Session duration: {} seconds",
            stats.records_accepted,
            stats.records_filtered,
            stats.records_dropped,
            stats.channel_overflows,
            stats.source_errors,
            stats.cycles_completed,
            stats.session_duration_secs
        )
    }
}

impl Default for IntakeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the intake counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSnapshot {
    pub records_accepted: u64,
    pub records_filtered: u64,
    pub records_dropped: u64,
    pub channel_overflows: u64,
    pub source_errors: u64,
    pub cycles_completed: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared intake counters.
pub type SharedIntakeStats = Arc<IntakeStats>;

/// Create a new shared set of counters.
pub fn create_shared_stats() -> SharedIntakeStats {
    Arc::new(IntakeStats::new())
}
