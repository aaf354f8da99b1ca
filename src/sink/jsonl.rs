//! JSON Lines output: one self-describing object per report.

use crate::core::reports::{ContentReport, LinkReport, UserReport, WindowLabel};
use crate::sink::{ReportSink, SinkError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};
use uuid::Uuid;

/// Name written into every line.
pub const PRODUCER_NAME: &str = "streamwatch";

/// Report payload, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Users(UserReport),
    Links(LinkReport),
    Content(ContentReport),
}

/// One line of output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    pub producer: String,
    pub version: String,
    /// Identifies all reports from one process run
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub window: WindowLabel,
    pub report: ReportBody,
}

pub struct JsonLinesSink<W: Write = Stdout> {
    out: W,
    run_id: Uuid,
}

impl JsonLinesSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, label: &WindowLabel, report: ReportBody) -> Result<(), SinkError> {
        let line = ReportLine {
            producer: PRODUCER_NAME.to_string(),
            version: crate::VERSION.to_string(),
            run_id: self.run_id,
            generated_at: Utc::now(),
            window: *label,
            report,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn emit_user_report(
        &mut self,
        label: &WindowLabel,
        report: &UserReport,
    ) -> Result<(), SinkError> {
        self.write_line(label, ReportBody::Users(report.clone()))
    }

    fn emit_link_report(
        &mut self,
        label: &WindowLabel,
        report: &LinkReport,
    ) -> Result<(), SinkError> {
        self.write_line(label, ReportBody::Links(report.clone()))
    }

    fn emit_content_report(
        &mut self,
        label: &WindowLabel,
        report: &ContentReport,
    ) -> Result<(), SinkError> {
        self.write_line(label, ReportBody::Content(report.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_carry_kind_and_run_id() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let run_id = sink.run_id();
        let label = WindowLabel::new(3, 5);

        sink.emit_user_report(&label, &UserReport::default()).unwrap();
        sink.emit_link_report(
            &label,
            &LinkReport {
                total_links: 1,
                domains: vec![("example.com".to_string(), 1)],
            },
        )
        .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["report"]["kind"], "users");
        assert_eq!(lines[1]["report"]["kind"], "links");
        assert_eq!(lines[1]["report"]["total_links"], 1);
        assert_eq!(lines[1]["window"]["elapsed_minutes"], 3);
        assert_eq!(lines[0]["run_id"], run_id.to_string());
        assert_eq!(lines[0]["producer"], PRODUCER_NAME);
    }
}
