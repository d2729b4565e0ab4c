//! Message manifest for the carousel
//!
//! An array of `{ "text": "...", "from": "...", "timestamp": "2024-02-14T09:30:00Z" }`.
//! `text` is required and must not be blank; `timestamp` is optional and may
//! also be a bare date (`2024-02-14`) or a date-time without offset, both
//! read as UTC.

use crate::error::{ContentError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// One carousel message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub from: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl Message {
    pub fn new(text: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: from.into(),
            timestamp: None,
        }
    }

    /// Date line shown under the message, e.g. "14 Feb 2024"
    pub fn display_date(&self) -> Option<String> {
        self.timestamp
            .map(|ts| ts.format("%-d %b %Y").to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    text: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl RawMessage {
    fn into_message(self) -> Option<Message> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        let timestamp = self.timestamp.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw.trim());
            if parsed.is_none() {
                debug!("Ignoring unparsable timestamp {:?}", raw);
            }
            parsed
        });

        Some(Message {
            text: text.to_string(),
            from: self.from.map(|f| f.trim().to_string()).unwrap_or_default(),
            timestamp,
        })
    }
}

/// ISO 8601 timestamp: full RFC 3339, or local forms taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.and_utc().fixed_offset())
}

/// Parse a message manifest, failing when the top level is not an array
///
/// Entries that are not objects, lack `text`, or have blank `text` are skipped.
pub fn parse_messages(json: &str) -> Result<Vec<Message>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ContentError::InvalidManifest(
            "message manifest must be an array".to_string(),
        ));
    };

    let total = items.len();
    let messages: Vec<Message> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawMessage>(item) {
            Ok(raw) => raw.into_message(),
            Err(e) => {
                debug!("Skipping malformed message entry: {}", e);
                None
            }
        })
        .collect();

    if messages.len() != total {
        debug!("Kept {} of {} messages", messages.len(), total);
    }
    Ok(messages)
}

/// Parse a manifest; any failure is logged and yields an empty list
pub fn load_messages(json: &str) -> Vec<Message> {
    parse_messages(json).unwrap_or_else(|e| {
        warn!("Message load failed: {}", e);
        Vec::new()
    })
}

/// Read and parse a manifest file
pub fn parse_messages_from_path(path: impl AsRef<Path>) -> Result<Vec<Message>> {
    let json = std::fs::read_to_string(path)?;
    parse_messages(&json)
}

/// Read and parse a manifest file; any failure is logged and yields an empty list
pub fn load_messages_from_path(path: impl AsRef<Path>) -> Vec<Message> {
    let path = path.as_ref();
    parse_messages_from_path(path).unwrap_or_else(|e| {
        warn!("Message load failed for {:?}: {}", path, e);
        Vec::new()
    })
}
