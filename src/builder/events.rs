//! Classification of streamed build records.
//!
//! The daemon emits one JSON document per record, carrying exactly one of
//! three payload kinds: `stream` (plain build output), `status` (progress
//! updates) or `errorDetail` (fatal error). Records are decoded structurally,
//! never by string splitting, because payloads can embed structured
//! sub-documents of their own.

use crate::error::{GantryError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Matches terminal ANSI escape/color sequences.
static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("valid ANSI regex"));

/// One classified build record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Plain build output line.
    Message(String),
    /// Progress/status update (downloading, extracting, ...).
    Status(String),
    /// Fatal error reported by the daemon; the build must abort immediately.
    FatalError(String),
}

#[derive(Debug, Deserialize)]
struct StreamRecord {
    stream: Option<String>,
    status: Option<String>,
    #[serde(rename = "errorDetail")]
    error_detail: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Strip terminal ANSI escape sequences. Idempotent.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Classify one raw streamed record.
///
/// Returns `Ok(None)` for well-formed records carrying none of the three
/// payload kinds (daemons emit auxiliary records the engine does not
/// consume). Undecodable records are an error.
pub fn classify(raw: &str) -> Result<Option<BuildEvent>> {
    let record: StreamRecord =
        serde_json::from_str(raw).map_err(|source| GantryError::MalformedRecord {
            record: raw.to_string(),
            source,
        })?;

    // errorDetail wins over anything else in the record
    if let Some(detail) = record.error_detail {
        return Ok(Some(BuildEvent::FatalError(strip_ansi(&detail.message))));
    }
    if let Some(text) = record.stream {
        return Ok(Some(BuildEvent::Message(strip_ansi(&text))));
    }
    if let Some(text) = record.status {
        return Ok(Some(BuildEvent::Status(strip_ansi(&text))));
    }

    Ok(None)
}

impl BuildEvent {
    /// The carried text, whatever the kind.
    pub fn text(&self) -> &str {
        match self {
            BuildEvent::Message(text) | BuildEvent::Status(text) | BuildEvent::FatalError(text) => {
                text
            }
        }
    }
}
