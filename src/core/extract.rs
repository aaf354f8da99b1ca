//! Record extraction from raw feed payloads.
//!
//! Everything past this point works on [`Record`]; raw payloads stop here.

use crate::feed::types::RawRecord;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// A normalized message held in a window slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Author screen name
    pub author: String,
    /// Message text, extended when available
    pub text: String,
    /// Registrable-ish domain for each referenced link, in entity order
    pub link_domains: Vec<String>,
}

impl Record {
    pub fn new(author: impl Into<String>, text: impl Into<String>, link_domains: Vec<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            link_domains,
        }
    }
}

/// Reasons a raw record cannot become a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("record has no text field")]
    MissingText,

    #[error("record has no author screen name")]
    MissingAuthor,
}

/// Convert a raw payload into a typed record.
///
/// The extended text replaces `text` only when it is longer. URL entities
/// without a usable host are skipped.
pub fn extract_record(raw: &RawRecord) -> Result<Record, ExtractError> {
    let short = raw.text.as_deref().ok_or(ExtractError::MissingText)?;
    let author = raw.screen_name().ok_or(ExtractError::MissingAuthor)?;

    let text = match raw.full_text() {
        Some(full) if full.chars().count() > short.chars().count() => full,
        _ => short,
    };

    let link_domains = raw.expanded_urls().filter_map(link_domain).collect();

    Ok(Record::new(author, text, link_domains))
}

/// Reduce a URL to the last two labels of its host.
///
/// `https://a.b.example.com/x` yields `example.com`. Ports, userinfo, query
/// and case do not affect the result. Multi-label public suffixes such as
/// `.co.uk` collapse to `co.uk`. IP hosts are kept whole.
pub fn link_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.');
            if domain.is_empty() {
                return None;
            }
            let labels: Vec<&str> = domain.split('.').collect();
            let keep = labels.len().min(2);
            Some(labels[labels.len() - keep..].join(".").to_lowercase())
        }
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}
