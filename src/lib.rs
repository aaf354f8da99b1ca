//! streamwatch - rolling-window reports over a keyword-filtered message stream.
//!
//! Messages arrive from an upstream stream, one JSON record per line. Every
//! minute the current slot is sealed and three reports are computed over the
//! last five slots: messages per author, link domains, and the most frequent
//! content words.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           streamwatch                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌────────────┐   ┌───────────┐  │
//! │  │ LineFeed  │──▶│ Extractor │──▶│ SlotStore  │──▶│  Reports  │  │
//! │  │ (thread)  │   │ (Record)  │   │ (5 x 1min) │   │ (3 views) │  │
//! │  └───────────┘   └───────────┘   └────────────┘   └───────────┘  │
//! │        │                               ▲                │        │
//! │        ▼                               │                ▼        │
//! │  ┌───────────┐                   ┌───────────┐    ┌───────────┐  │
//! │  │  Intake   │                   │  Ticker   │    │   Sink    │  │
//! │  │   Stats   │                   │ (minute)  │    │ (console) │  │
//! │  └───────────┘                   └───────────┘    └───────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use streamwatch::{
//!     core::{CycleController, Ticker, SLOT_DURATION},
//!     feed::{open_input, FeedFilter, LineFeed, LineFeedConfig},
//!     sink::ConsoleSink,
//!     stats::create_shared_stats,
//! };
//!
//! let stats = create_shared_stats();
//! let mut feed = LineFeed::new(
//!     LineFeedConfig { filter: FeedFilter::new("rust", Some("en")), channel_capacity: 10_000 },
//!     stats.clone(),
//! );
//! feed.start(open_input(None).expect("stdin")).expect("Failed to start feed");
//!
//! let mut controller = CycleController::new(ConsoleSink::stdout(), stats, 5);
//! let running = AtomicBool::new(true);
//! controller.run(feed.receiver(), &mut Ticker::new(SLOT_DURATION), &running);
//! ```

pub mod config;
pub mod core;
pub mod feed;
pub mod sink;
pub mod stats;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, OutputFormat};
pub use crate::core::{
    CycleController, CycleOutcome, CycleReports, Record, SlotStore, StopReason, Ticker,
    WindowLabel,
};
pub use feed::{FeedEvent, FeedFilter, LineFeed, LineFeedConfig, RawRecord};
pub use sink::{ConsoleSink, JsonLinesSink, MemorySink, ReportSink, SinkError};
pub use stats::{IntakeStats, SharedIntakeStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
