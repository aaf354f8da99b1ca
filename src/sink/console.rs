//! Plain-text tables for a terminal.

use crate::core::reports::{ContentReport, LinkReport, UserReport, WindowLabel};
use crate::sink::{ReportSink, SinkError};
use std::io::{self, Stdout, Write};

/// Width of the key column.
const KEY_WIDTH: usize = 20;

/// Writes reports as left-justified two-column tables.
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(KEY_WIDTH + 10))
    }

    fn row(&mut self, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{key:<width$}| {value}", width = KEY_WIDTH)
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn emit_user_report(
        &mut self,
        label: &WindowLabel,
        report: &UserReport,
    ) -> Result<(), SinkError> {
        writeln!(self.out, "\n\nReports {label}")?;
        writeln!(self.out, "\n\nUser Report:\n")?;
        self.row("User", "Tweet Count")?;
        self.rule()?;
        for (user, count) in &report.counts {
            self.row(user, count)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn emit_link_report(
        &mut self,
        _label: &WindowLabel,
        report: &LinkReport,
    ) -> Result<(), SinkError> {
        writeln!(self.out, "\n\nLinks Report:\n")?;
        writeln!(self.out, "Total Number of links: {}", report.total_links)?;
        writeln!(
            self.out,
            "\nList of unique domains sorted by their count in decreasing order:"
        )?;
        self.rule()?;
        self.row("Domain Name", "Count")?;
        self.rule()?;
        for (domain, count) in &report.domains {
            self.row(domain, count)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn emit_content_report(
        &mut self,
        _label: &WindowLabel,
        report: &ContentReport,
    ) -> Result<(), SinkError> {
        writeln!(self.out, "\n\nContent Report:\n")?;
        writeln!(self.out, "Number of unique words: {}", report.unique_words)?;
        writeln!(
            self.out,
            "\nTop {} most frequent words:",
            crate::core::reports::TOP_WORDS
        )?;
        self.rule()?;
        self.row("Word", "Count")?;
        self.rule()?;
        for (word, count) in &report.top_words {
            self.row(word, count)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn output(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_user_table_layout() {
        let mut sink = ConsoleSink::new(Vec::new());
        let counts: BTreeMap<String, u64> = [("alice".to_string(), 3)].into_iter().collect();
        sink.emit_user_report(&WindowLabel::new(1, 5), &UserReport { counts })
            .unwrap();

        let text = output(sink);
        assert!(text.contains("Reports after 1 minute(s), covering minutes 0-1"));
        assert!(text.contains("User                | Tweet Count"));
        assert!(text.contains("alice               | 3"));
        assert!(text.contains(&"-".repeat(30)));
    }

    #[test]
    fn test_link_and_content_tables() {
        let mut sink = ConsoleSink::new(Vec::new());
        let label = WindowLabel::new(0, 5);
        sink.emit_link_report(
            &label,
            &LinkReport {
                total_links: 2,
                domains: vec![("example.com".to_string(), 2)],
            },
        )
        .unwrap();
        sink.emit_content_report(
            &label,
            &ContentReport {
                unique_words: 1,
                top_words: vec![("rust".to_string(), 4)],
            },
        )
        .unwrap();

        let text = output(sink);
        assert!(text.contains("Total Number of links: 2"));
        assert!(text.contains("example.com         | 2"));
        assert!(text.contains("Number of unique words: 1"));
        assert!(text.contains("Top 10 most frequent words:"));
        assert!(text.contains("rust                | 4"));
    }
}
