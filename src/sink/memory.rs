//! In-memory sink that keeps every emitted report.

use crate::core::reports::{ContentReport, LinkReport, UserReport, WindowLabel};
use crate::sink::{ReportSink, SinkError};

#[derive(Debug, Default)]
pub struct MemorySink {
    pub users: Vec<(WindowLabel, UserReport)>,
    pub links: Vec<(WindowLabel, LinkReport)>,
    pub content: Vec<(WindowLabel, ContentReport)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of complete cycles received.
    pub fn cycles(&self) -> usize {
        self.users
            .len()
            .min(self.links.len())
            .min(self.content.len())
    }

    pub fn last_users(&self) -> Option<&UserReport> {
        self.users.last().map(|(_, r)| r)
    }

    pub fn last_links(&self) -> Option<&LinkReport> {
        self.links.last().map(|(_, r)| r)
    }

    pub fn last_content(&self) -> Option<&ContentReport> {
        self.content.last().map(|(_, r)| r)
    }

    pub fn last_label(&self) -> Option<&WindowLabel> {
        self.users.last().map(|(l, _)| l)
    }
}

impl ReportSink for MemorySink {
    fn emit_user_report(
        &mut self,
        label: &WindowLabel,
        report: &UserReport,
    ) -> Result<(), SinkError> {
        self.users.push((*label, report.clone()));
        Ok(())
    }

    fn emit_link_report(
        &mut self,
        label: &WindowLabel,
        report: &LinkReport,
    ) -> Result<(), SinkError> {
        self.links.push((*label, report.clone()));
        Ok(())
    }

    fn emit_content_report(
        &mut self,
        label: &WindowLabel,
        report: &ContentReport,
    ) -> Result<(), SinkError> {
        self.content.push((*label, report.clone()));
        Ok(())
    }
}
