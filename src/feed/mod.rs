//! Feed intake for streamwatch.
//!
//! This module decodes raw records from the upstream stream, applies the
//! keyword and language filter, and hands events to the cycle controller.

pub mod filter;
pub mod line;
pub mod types;

// Re-export commonly used types
pub use filter::FeedFilter;
pub use line::{open_input, FeedError, LineFeed, LineFeedConfig};
pub use types::{FeedEvent, RawEntities, RawExtendedText, RawRecord, RawUrl, RawUser};
