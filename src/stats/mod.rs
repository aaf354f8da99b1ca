//! Session statistics for streamwatch.

pub mod counters;

// Re-export commonly used types
pub use counters::{create_shared_stats, IntakeSnapshot, IntakeStats, SharedIntakeStats};
