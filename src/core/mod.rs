//! Core functionality for streamwatch.
//!
//! This module contains:
//! - Record extraction from raw feed payloads
//! - The slot store holding the rolling window
//! - Word tokenization and the three report aggregators
//! - The ticker and the cycle controller that drive rotation

pub mod clock;
pub mod cycle;
pub mod extract;
pub mod reports;
pub mod slots;
pub mod tokenize;

// Re-export commonly used types
pub use clock::{Ticker, SLOT_DURATION};
pub use cycle::{CycleController, CycleOutcome, StopReason, WindowState};
pub use extract::{extract_record, link_domain, ExtractError, Record};
pub use reports::{
    content_report, link_report, user_report, ContentReport, CycleReports, LinkReport,
    UserReport, WindowLabel, TOP_WORDS,
};
pub use slots::{Slot, SlotStore, WINDOW_SLOTS};
pub use tokenize::{content_words, tokenize};
