//! Cycle controller: intake, slot rotation and report emission.
//!
//! The controller owns the window exclusively. Appends and advances both run
//! on the controller's thread, so a slot is never appended to while it is
//! being rotated. On every tick the events already queued by the feed are
//! drained into the current slot before it is sealed.

use crate::core::clock::Ticker;
use crate::core::extract::extract_record;
use crate::core::reports::{content_report, link_report, user_report, CycleReports, WindowLabel};
use crate::core::slots::SlotStore;
use crate::feed::types::{FeedEvent, RawRecord};
use crate::sink::ReportSink;
use crate::stats::SharedIntakeStats;
use chrono::{DateTime, Utc};
use crossbeam_channel::{never, select, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How often the run loop checks the shutdown flag while idle.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// The rolling window plus the elapsed-minute counter used for labels.
#[derive(Debug, Clone, Default)]
pub struct WindowState {
    slots: SlotStore,
    elapsed_minutes: u64,
}

impl WindowState {
    pub fn new(slots: SlotStore) -> Self {
        Self {
            slots,
            elapsed_minutes: 0,
        }
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_minutes
    }

    /// Label for the window as it stands now.
    pub fn label(&self) -> WindowLabel {
        WindowLabel::new(self.elapsed_minutes, self.slots.capacity())
    }

    fn advance(&mut self, now: DateTime<Utc>) -> usize {
        self.elapsed_minutes += 1;
        self.slots.advance(now)
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Continue,
    /// The configured cycle limit was reached
    Finished,
}

/// Why [`CycleController::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxCycles,
    Shutdown,
}

pub struct CycleController<S: ReportSink> {
    state: WindowState,
    sink: S,
    stats: SharedIntakeStats,
    /// Zero means no limit
    max_cycles: u32,
}

impl<S: ReportSink> CycleController<S> {
    pub fn new(sink: S, stats: SharedIntakeStats, max_cycles: u32) -> Self {
        Self::with_state(WindowState::default(), sink, stats, max_cycles)
    }

    pub fn with_state(
        state: WindowState,
        sink: S,
        stats: SharedIntakeStats,
        max_cycles: u32,
    ) -> Self {
        Self {
            state,
            sink,
            stats,
            max_cycles,
        }
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Extract a raw record and append it to the current slot.
    ///
    /// Records that fail extraction are dropped and counted.
    pub fn on_record(&mut self, raw: &RawRecord) {
        match extract_record(raw) {
            Ok(record) => {
                debug!(
                    author = %record.author,
                    minute = self.state.slots.current_minute(),
                    "Appending record"
                );
                self.state.slots.append(record);
                self.stats.record_accepted();
            }
            Err(e) => {
                warn!("Dropping malformed record: {e}");
                self.stats.record_dropped();
            }
        }
    }

    /// Log a source error. The stream keeps going.
    pub fn on_source_error(&mut self, status: &str) {
        warn!("Feed source error: {status}");
        self.stats.record_source_error();
    }

    pub fn on_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Record(raw) => self.on_record(&raw),
            FeedEvent::SourceError(status) => self.on_source_error(&status),
        }
    }

    /// Compute all three reports over the current window.
    pub fn compute_reports(&self) -> CycleReports {
        let slots = &self.state.slots;
        CycleReports {
            label: self.state.label(),
            users: user_report(slots.live_slots()),
            links: link_report(slots.live_slots()),
            content: content_report(slots.live_slots()),
        }
    }

    /// Seal the current slot, then compute and emit the reports.
    pub fn on_tick(&mut self) -> CycleOutcome {
        self.on_tick_at(Utc::now())
    }

    pub fn on_tick_at(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        let evicted = self.state.advance(now);
        let reports = self.compute_reports();
        self.emit(&reports);
        self.stats.record_cycle_completed();

        info!(
            elapsed_minutes = reports.label.elapsed_minutes,
            records = self.state.slots.record_count(),
            authors = reports.users.counts.len(),
            links = reports.links.total_links,
            unique_words = reports.content.unique_words,
            evicted,
            warming_up = reports.label.is_warming_up(self.state.slots.capacity()),
            "Report cycle completed"
        );

        let limit = u64::from(self.max_cycles);
        if limit != 0 && self.state.elapsed_minutes >= limit {
            CycleOutcome::Finished
        } else {
            CycleOutcome::Continue
        }
    }

    fn emit(&mut self, reports: &CycleReports) {
        let label = &reports.label;
        if let Err(e) = self.sink.emit_user_report(label, &reports.users) {
            error!("Failed to emit user report: {e}");
        }
        if let Err(e) = self.sink.emit_link_report(label, &reports.links) {
            error!("Failed to emit link report: {e}");
        }
        if let Err(e) = self.sink.emit_content_report(label, &reports.content) {
            error!("Failed to emit content report: {e}");
        }
    }

    /// Append every event already waiting in the channel.
    pub fn drain(&mut self, feed: &Receiver<FeedEvent>) -> usize {
        let mut drained = 0;
        while let Ok(event) = feed.try_recv() {
            self.on_feed_event(event);
            drained += 1;
        }
        drained
    }

    /// Run until the cycle limit is reached or `running` is cleared.
    ///
    /// After the feed disconnects the controller keeps ticking, so the
    /// window keeps sliding and earlier records age out of the reports.
    pub fn run(
        &mut self,
        feed: &Receiver<FeedEvent>,
        ticker: &mut Ticker,
        running: &AtomicBool,
    ) -> StopReason {
        let closed = never::<FeedEvent>();
        let mut feed_open = true;

        loop {
            if !running.load(Ordering::SeqCst) {
                return StopReason::Shutdown;
            }

            let intake = if feed_open { feed } else { &closed };
            let deadline = ticker.deadline();

            select! {
                recv(intake) -> event => match event {
                    Ok(event) => self.on_feed_event(event),
                    Err(_) => {
                        info!("Feed closed, reports continue until stopped");
                        feed_open = false;
                    }
                },
                recv(deadline) -> _ => {
                    ticker.mark_fired();
                    let drained = self.drain(intake);
                    if drained > 0 {
                        debug!(drained, "Drained queued events before advancing");
                    }
                    if self.on_tick() == CycleOutcome::Finished {
                        return StopReason::MaxCycles;
                    }
                },
                default(SHUTDOWN_POLL) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::stats::create_shared_stats;

    fn raw(author: &str, text: &str) -> RawRecord {
        RawRecord::from_json(&format!(
            r#"{{"user": {{"screen_name": "{author}"}}, "text": "{text}"}}"#
        ))
        .unwrap()
    }

    fn controller(max_cycles: u32) -> CycleController<MemorySink> {
        CycleController::new(MemorySink::new(), create_shared_stats(), max_cycles)
    }

    #[test]
    fn test_tick_emits_all_three_reports() {
        let mut controller = controller(0);
        controller.on_record(&raw("alice", "hello rust"));
        assert_eq!(controller.on_tick(), CycleOutcome::Continue);

        let sink = controller.sink();
        assert_eq!(sink.cycles(), 1);
        assert_eq!(sink.last_label().unwrap().elapsed_minutes, 1);
        assert_eq!(sink.last_users().unwrap().counts["alice"], 1);
    }

    #[test]
    fn test_malformed_records_are_dropped_and_counted() {
        let mut controller = controller(0);
        controller.on_record(&RawRecord::from_json(r#"{"user": {"screen_name": "a"}}"#).unwrap());
        controller.on_source_error("420");

        let stats = controller.stats.stats();
        assert_eq!(stats.records_dropped, 1);
        assert_eq!(stats.source_errors, 1);
        assert_eq!(controller.state().slots().record_count(), 0);
    }

    #[test]
    fn test_max_cycles_finishes() {
        let mut controller = controller(2);
        assert_eq!(controller.on_tick(), CycleOutcome::Continue);
        assert_eq!(controller.on_tick(), CycleOutcome::Finished);
    }

    #[test]
    fn test_drain_appends_queued_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(FeedEvent::Record(raw("a", "one"))).unwrap();
        tx.send(FeedEvent::SourceError("hiccup".to_string())).unwrap();
        tx.send(FeedEvent::Record(raw("b", "two"))).unwrap();

        let mut controller = controller(0);
        assert_eq!(controller.drain(&rx), 3);
        assert_eq!(controller.state().slots().record_count(), 2);
    }

    #[test]
    fn test_run_stops_at_max_cycles() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(FeedEvent::Record(raw("alice", "queued before boundary")))
            .unwrap();

        let mut controller = controller(2);
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let running = AtomicBool::new(true);

        let reason = controller.run(&rx, &mut ticker, &running);
        assert_eq!(reason, StopReason::MaxCycles);

        let sink = controller.sink();
        assert_eq!(sink.cycles(), 2);
        // The queued record made it into minute 0, which both windows still hold.
        assert_eq!(sink.users[0].1.counts["alice"], 1);
        assert_eq!(sink.users[1].1.counts["alice"], 1);
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let (_tx, rx) = crossbeam_channel::unbounded::<FeedEvent>();
        let mut controller = controller(0);
        let mut ticker = Ticker::new(Duration::from_secs(3600));
        let running = AtomicBool::new(false);

        assert_eq!(
            controller.run(&rx, &mut ticker, &running),
            StopReason::Shutdown
        );
        assert_eq!(controller.sink().cycles(), 0);
    }
}
