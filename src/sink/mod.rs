//! Report sinks.
//!
//! The cycle controller hands every report to a [`ReportSink`]. Formatting and
//! output are entirely the sink's business.

pub mod console;
pub mod jsonl;
pub mod memory;

use crate::core::reports::{ContentReport, LinkReport, UserReport, WindowLabel};

pub use console::ConsoleSink;
pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;

/// Errors a sink can hit while emitting.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for the three per-cycle reports.
pub trait ReportSink {
    fn emit_user_report(&mut self, label: &WindowLabel, report: &UserReport)
        -> Result<(), SinkError>;

    fn emit_link_report(&mut self, label: &WindowLabel, report: &LinkReport)
        -> Result<(), SinkError>;

    fn emit_content_report(
        &mut self,
        label: &WindowLabel,
        report: &ContentReport,
    ) -> Result<(), SinkError>;
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn emit_user_report(
        &mut self,
        label: &WindowLabel,
        report: &UserReport,
    ) -> Result<(), SinkError> {
        (**self).emit_user_report(label, report)
    }

    fn emit_link_report(
        &mut self,
        label: &WindowLabel,
        report: &LinkReport,
    ) -> Result<(), SinkError> {
        (**self).emit_link_report(label, report)
    }

    fn emit_content_report(
        &mut self,
        label: &WindowLabel,
        report: &ContentReport,
    ) -> Result<(), SinkError> {
        (**self).emit_content_report(label, report)
    }
}
