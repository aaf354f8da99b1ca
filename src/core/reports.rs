//! Report computation over the live window.
//!
//! Each aggregator is a pure function of the live slots and is recomputed in
//! full every cycle. Counting keeps first-seen order, so ties in the sorted
//! reports come out in the order keys first appeared in the window (oldest
//! slot first).

use crate::core::slots::Slot;
use crate::core::tokenize::content_words;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Number of words listed in the content report.
pub const TOP_WORDS: usize = 10;

/// Minute range a set of reports covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLabel {
    /// Minutes elapsed since the controller started
    pub elapsed_minutes: u64,
    /// Oldest minute still in the window
    pub first_minute: u64,
    /// Newest minute in the window (the freshly opened slot)
    pub last_minute: u64,
}

impl WindowLabel {
    /// Label for the window after `elapsed_minutes` advances of a window
    /// holding `window_slots` slots.
    pub fn new(elapsed_minutes: u64, window_slots: usize) -> Self {
        Self {
            elapsed_minutes,
            first_minute: (elapsed_minutes + 1).saturating_sub(window_slots as u64),
            last_minute: elapsed_minutes,
        }
    }

    /// Whether the window still spans fewer minutes than its capacity.
    pub fn is_warming_up(&self, window_slots: usize) -> bool {
        self.elapsed_minutes + 1 < window_slots as u64
    }
}

impl std::fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "after {} minute(s), covering minutes {}-{}",
            self.elapsed_minutes, self.first_minute, self.last_minute
        )
    }
}

/// Insertion-ordered counter.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries by count descending; `sort_by` is stable so ties keep
    /// first-seen order.
    fn into_sorted(mut self) -> Vec<(String, u64)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

/// Records per author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub counts: BTreeMap<String, u64>,
}

impl UserReport {
    /// Sum of all per-author counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Link domains referenced in the window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Link occurrences, not unique domains
    pub total_links: u64,
    /// Domains by count descending
    pub domains: Vec<(String, u64)>,
}

/// Most frequent content words in the window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReport {
    pub unique_words: usize,
    /// At most [`TOP_WORDS`] words by count descending
    pub top_words: Vec<(String, u64)>,
}

/// Count records per author.
pub fn user_report<'a, I>(slots: I) -> UserReport
where
    I: IntoIterator<Item = &'a Slot>,
{
    let mut counts = BTreeMap::new();
    for record in slots.into_iter().flat_map(|s| s.records.iter()) {
        *counts.entry(record.author.clone()).or_insert(0) += 1;
    }
    UserReport { counts }
}

/// Count link domains.
pub fn link_report<'a, I>(slots: I) -> LinkReport
where
    I: IntoIterator<Item = &'a Slot>,
{
    let mut tally = Tally::default();
    for domain in slots
        .into_iter()
        .flat_map(|s| s.records.iter())
        .flat_map(|r| r.link_domains.iter())
    {
        tally.add(domain);
    }

    LinkReport {
        total_links: tally.total(),
        domains: tally.into_sorted(),
    }
}

/// Count content words and keep the top [`TOP_WORDS`].
pub fn content_report<'a, I>(slots: I) -> ContentReport
where
    I: IntoIterator<Item = &'a Slot>,
{
    let mut tally = Tally::default();
    for record in slots.into_iter().flat_map(|s| s.records.iter()) {
        for word in content_words(&record.text) {
            tally.add(&word);
        }
    }

    let unique_words = tally.len();
    let mut top_words = tally.into_sorted();
    top_words.truncate(TOP_WORDS);

    ContentReport {
        unique_words,
        top_words,
    }
}

/// The three reports of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReports {
    pub label: WindowLabel,
    pub users: UserReport,
    pub links: LinkReport,
    pub content: ContentReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::Record;
    use crate::core::slots::SlotStore;
    use chrono::Utc;

    fn record(author: &str, text: &str, domains: &[&str]) -> Record {
        Record::new(
            author,
            text,
            domains.iter().map(|d| d.to_string()).collect(),
        )
    }

    #[test]
    fn test_user_report_counts_per_author() {
        let mut store = SlotStore::new();
        for _ in 0..3 {
            store.append(record("alice", "hi", &[]));
        }
        for _ in 0..2 {
            store.append(record("bob", "hi", &[]));
        }

        let report = user_report(store.live_slots());
        let expected: BTreeMap<String, u64> =
            [("alice".to_string(), 3), ("bob".to_string(), 2)].into_iter().collect();
        assert_eq!(report.counts, expected);
        assert_eq!(report.total(), store.record_count() as u64);
    }

    #[test]
    fn test_link_report_totals_and_order() {
        let mut store = SlotStore::new();
        store.append(record("a", "x", &["b.com", "a.com"]));
        store.append(record("b", "y", &["a.com", "c.com", "b.com"]));
        store.append(record("c", "z", &["c.com", "a.com"]));

        let report = link_report(store.live_slots());
        assert_eq!(report.total_links, 7);
        assert_eq!(
            report.domains,
            vec![
                ("a.com".to_string(), 3),
                ("b.com".to_string(), 2),
                ("c.com".to_string(), 2),
            ]
        );
        let sum: u64 = report.domains.iter().map(|(_, c)| c).sum();
        assert_eq!(sum, report.total_links);
    }

    #[test]
    fn test_content_report_top_words() {
        let mut store = SlotStore::new();
        store.append(record("a", "Rust rust crab. It's a crab!", &[]));
        store.append(record("b", "Don't panic, rust", &[]));

        let report = content_report(store.live_slots());
        assert_eq!(report.unique_words, 4);
        assert_eq!(
            report.top_words,
            vec![
                ("rust".to_string(), 3),
                ("crab".to_string(), 2),
                ("don't".to_string(), 1),
                ("panic".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_content_report_truncates_to_top_words() {
        let mut store = SlotStore::new();
        let text: Vec<String> = (0..15).map(|i| format!("word{i}")).collect();
        store.append(record("a", &text.join(" "), &[]));

        let report = content_report(store.live_slots());
        assert_eq!(report.unique_words, 15);
        assert_eq!(report.top_words.len(), TOP_WORDS);
        assert_eq!(report.top_words[0].0, "word0");
    }

    #[test]
    fn test_empty_window_reports() {
        let store = SlotStore::new();
        assert_eq!(user_report(store.live_slots()), UserReport::default());
        assert_eq!(link_report(store.live_slots()), LinkReport::default());
        assert_eq!(content_report(store.live_slots()), ContentReport::default());
    }

    #[test]
    fn test_reports_are_idempotent() {
        let mut store = SlotStore::new();
        store.append(record("a", "same words same", &["x.com"]));
        store.advance(Utc::now());
        store.append(record("b", "other words", &["y.com", "x.com"]));

        assert_eq!(user_report(store.live_slots()), user_report(store.live_slots()));
        assert_eq!(link_report(store.live_slots()), link_report(store.live_slots()));
        assert_eq!(
            content_report(store.live_slots()),
            content_report(store.live_slots())
        );
    }

    #[test]
    fn test_window_label() {
        let label = WindowLabel::new(2, 5);
        assert_eq!((label.first_minute, label.last_minute), (0, 2));
        assert!(label.is_warming_up(5));

        let label = WindowLabel::new(7, 5);
        assert_eq!((label.first_minute, label.last_minute), (3, 7));
        assert!(!label.is_warming_up(5));
        assert_eq!(label.to_string(), "after 7 minute(s), covering minutes 3-7");
    }
}
