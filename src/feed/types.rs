//! Raw record shapes as delivered by the upstream stream.
//!
//! Every field is optional at this layer. Required-field checks happen in
//! [`crate::core::extract`], which turns a [`RawRecord`] into a typed record.

use serde::{Deserialize, Serialize};

/// A raw message as decoded from one line of the feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Posting account
    #[serde(default)]
    pub user: Option<RawUser>,
    /// Short (possibly truncated) message text
    #[serde(default)]
    pub text: Option<String>,
    /// Untruncated text for long messages
    #[serde(default)]
    pub extended_tweet: Option<RawExtendedText>,
    /// Link entities referenced by the message
    #[serde(default)]
    pub entities: RawEntities,
    /// BCP 47 language tag assigned by the source
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub screen_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawExtendedText {
    #[serde(default)]
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntities {
    #[serde(default)]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUrl {
    #[serde(default)]
    pub expanded_url: Option<String>,
}

impl RawRecord {
    /// Parse a raw record from a JSON string.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Author screen name, if present.
    pub fn screen_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.screen_name.as_deref())
    }

    /// Extended text, if present.
    pub fn full_text(&self) -> Option<&str> {
        self.extended_tweet
            .as_ref()
            .and_then(|e| e.full_text.as_deref())
    }

    /// Expanded URLs of all link entities that carry one.
    pub fn expanded_urls(&self) -> impl Iterator<Item = &str> {
        self.entities
            .urls
            .iter()
            .filter_map(|u| u.expanded_url.as_deref())
    }
}

/// An event handed from the feed thread to the cycle controller.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A decoded record that passed the feed filter
    Record(RawRecord),
    /// A non-fatal error reported by the source
    SourceError(String),
}
