//! Line-oriented feed: one JSON record per line from stdin or a file.
//!
//! Decoding and filtering happen on a background thread. Events are handed to
//! the controller through a bounded channel with `try_send`, so the reader is
//! never held up by aggregation work.

use crate::feed::filter::FeedFilter;
use crate::feed::types::{FeedEvent, RawRecord};
use crate::stats::SharedIntakeStats;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Configuration for a line feed.
#[derive(Debug, Clone)]
pub struct LineFeedConfig {
    pub filter: FeedFilter,
    pub channel_capacity: usize,
}

/// Errors that can occur while setting up the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed is already running")]
    AlreadyRunning,

    #[error("Could not open feed input {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not spawn feed thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Feed that reads newline-delimited JSON records on a background thread.
pub struct LineFeed {
    config: LineFeedConfig,
    sender: Option<Sender<FeedEvent>>,
    receiver: Receiver<FeedEvent>,
    running: Arc<AtomicBool>,
    stats: SharedIntakeStats,
    handle: Option<JoinHandle<()>>,
}

impl LineFeed {
    /// Create a new, not yet started feed.
    pub fn new(config: LineFeedConfig, stats: SharedIntakeStats) -> Self {
        let (sender, receiver) = bounded(config.channel_capacity.max(1));
        Self {
            config,
            sender: Some(sender),
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            stats,
            handle: None,
        }
    }

    /// Start reading from the given input.
    ///
    /// The channel disconnects once the input is exhausted or the feed is
    /// stopped. A feed can only be started once.
    pub fn start<R>(&mut self, reader: R) -> Result<(), FeedError>
    where
        R: BufRead + Send + 'static,
    {
        let sender = self.sender.take().ok_or(FeedError::AlreadyRunning)?;
        let filter = self.config.filter.clone();
        let running = self.running.clone();
        let stats = self.stats.clone();

        running.store(true, Ordering::SeqCst);
        info!(keyword = filter.keyword(), "Feed started");

        let handle = thread::Builder::new()
            .name("streamwatch-feed".to_string())
            .spawn(move || {
                pump_lines(reader, &filter, &sender, &running, &stats);
                running.store(false, Ordering::SeqCst);
                debug!("Feed thread finished");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                FeedError::Spawn(e)
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop reading. The thread exits after its current line.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the feed thread is still reading.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for feed events.
    pub fn receiver(&self) -> &Receiver<FeedEvent> {
        &self.receiver
    }

    /// Wait for the feed thread to exit.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Feed thread panicked");
            }
        }
    }
}

/// Open the feed input: a file when a path is given, stdin otherwise.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead + Send>, FeedError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| FeedError::Open {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

fn pump_lines<R: BufRead>(
    mut reader: R,
    filter: &FeedFilter,
    sender: &Sender<FeedEvent>,
    running: &AtomicBool,
    stats: &SharedIntakeStats,
) {
    let mut buf = Vec::new();
    while running.load(Ordering::SeqCst) {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                forward(sender, FeedEvent::SourceError(format!("read failed: {e}")), stats);
                break;
            }
        }

        let event = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                // Streams send blank keep-alive lines.
                if line.is_empty() {
                    continue;
                }
                match RawRecord::from_json(line) {
                    Ok(record) if filter.matches(&record) => FeedEvent::Record(record),
                    Ok(_) => {
                        stats.record_filtered();
                        continue;
                    }
                    Err(e) => FeedEvent::SourceError(format!("undecodable line: {e}")),
                }
            }
            Err(e) => FeedEvent::SourceError(format!("line is not valid UTF-8: {e}")),
        };

        if !forward(sender, event, stats) {
            break;
        }
    }
}

/// Hand an event to the controller. Returns false once the receiver is gone.
fn forward(sender: &Sender<FeedEvent>, event: FeedEvent, stats: &SharedIntakeStats) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            stats.record_overflow();
            warn!("Feed channel full, dropping event");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::create_shared_stats;
    use std::io::Cursor;
    use std::time::Duration;

    fn feed(capacity: usize) -> LineFeed {
        LineFeed::new(
            LineFeedConfig {
                filter: FeedFilter::new("rust", None),
                channel_capacity: capacity,
            },
            create_shared_stats(),
        )
    }

    fn drain(feed: &LineFeed) -> Vec<FeedEvent> {
        let mut events = Vec::new();
        while let Ok(event) = feed.receiver().recv_timeout(Duration::from_secs(2)) {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_feed_decodes_filters_and_reports_errors() {
        let input = concat!(
            r#"{"user": {"screen_name": "a"}, "text": "rust is fun"}"#,
            "\n",
            "\n",
            r#"{"user": {"screen_name": "b"}, "text": "go is fun"}"#,
            "\n",
            "not json\n",
        );
        let mut feed = feed(16);
        feed.start(Cursor::new(input)).unwrap();
        let events = drain(&feed);
        feed.join();

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], FeedEvent::Record(r) if r.screen_name() == Some("a")));
        assert!(matches!(&events[1], FeedEvent::SourceError(_)));
        assert_eq!(feed.stats.stats().records_filtered, 1);
        assert!(!feed.is_running());
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_the_feed() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"user": {"screen_name": "a"}, "text": "rust one"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"user": {"screen_name": "b"}, "text": "rust two"}"#);
        input.push(b'\n');

        let mut feed = feed(16);
        feed.start(Cursor::new(input)).unwrap();
        let events = drain(&feed);
        feed.join();

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], FeedEvent::Record(r) if r.screen_name() == Some("a")));
        assert!(matches!(&events[1], FeedEvent::SourceError(msg) if msg.contains("UTF-8")));
        assert!(matches!(&events[2], FeedEvent::Record(r) if r.screen_name() == Some("b")));
    }

    #[test]
    fn test_last_line_without_newline_is_read() {
        let mut feed = feed(4);
        feed.start(Cursor::new(r#"{"text": "rust"}"#)).unwrap();
        let events = drain(&feed);
        feed.join();

        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_feed_counts_overflow_instead_of_blocking() {
        let line = r#"{"text": "rust"}"#;
        let input = format!("{line}\n{line}\n{line}\n");
        let mut feed = feed(1);
        feed.start(Cursor::new(input)).unwrap();
        feed.join();

        assert_eq!(feed.stats.stats().channel_overflows, 2);
        assert_eq!(drain(&feed).len(), 1);
    }

    #[test]
    fn test_feed_starts_once() {
        let mut feed = feed(4);
        feed.start(Cursor::new("")).unwrap();
        assert!(matches!(
            feed.start(Cursor::new("")),
            Err(FeedError::AlreadyRunning)
        ));
        feed.join();
    }

    #[test]
    fn test_open_input_missing_file() {
        let result = open_input(Some(Path::new("/definitely/not/here.jsonl")));
        assert!(matches!(result, Err(FeedError::Open { .. })));
    }
}
