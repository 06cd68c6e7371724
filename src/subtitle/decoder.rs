//! SAMI document decoder
//!
//! Recovers caption segments from a SAMI document. The parser is lenient about
//! structure (missing closing tags, optional `<P>` wrappers, attribute order,
//! letter case) but strict about timestamps: a `Start` value that is not an
//! integer fails the whole decode.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::escape::clean_payload;
use crate::error::{CaptionError, Result};

/// A decoded caption with a time range derived from its successor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSegment {
    /// Start time in milliseconds
    pub start_time_ms: u64,
    /// Start of the following segment, `None` for the last one
    pub end_time_ms: Option<u64>,
    /// `end_time_ms - start_time_ms` when the end is known
    pub duration_ms: Option<u64>,
    /// Decoded text, lines separated by `\n`; empty for clearing events
    pub text: String,
}

impl CaptionSegment {
    /// Blank segments only clear the screen
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A SYNC event as found in the document, before sorting
#[derive(Debug)]
struct RawSyncEvent<'a> {
    start_ms: u64,
    raw_html: &'a str,
}

/// Slice between `<BODY ...>` and `</BODY>`; runs to the end of the document
/// when the closing tag is missing
fn body_of(document: &str) -> Option<&str> {
    let open = regex!(r"(?i)<BODY\b[^>]*>").find(document)?;
    let rest = &document[open.end()..];
    let end = regex!(r"(?i)</BODY\s*>")
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Parse the `Start` attribute of SYNC event number `index`
fn parse_start(attributes: &str, index: usize) -> Result<u64> {
    let caps = regex!(r#"(?i)\bStart\s*=\s*["']?([^\s"'>]*)"#)
        .captures(attributes)
        .ok_or(CaptionError::MissingTimestamp { index })?;
    let value = &caps[1];
    let invalid = || CaptionError::InvalidTimestamp {
        index,
        value: value.to_string(),
    };
    // Plain digits only; `parse` alone would also take a leading `+`.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u64>().map_err(|_| invalid())
}

/// Strip the optional paragraph wrapper and closing SYNC tag from a payload
fn unwrap_payload(chunk: &str) -> &str {
    regex!(r"(?is)^\s*(?:<P\b[^>]*>)?(.*?)(?:</P\s*>)?\s*(?:</SYNC\s*>)?\s*$")
        .captures(chunk)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(chunk)
}

fn extract_events(body: &str) -> Result<Vec<RawSyncEvent<'_>>> {
    let sync_open = regex!(r"(?i)<SYNC\b([^>]*)>");

    let opens: Vec<regex::Captures> = sync_open.captures_iter(body).collect();
    let mut events = Vec::with_capacity(opens.len());
    for (index, caps) in opens.iter().enumerate() {
        let start_ms = parse_start(&caps[1], index)?;
        let payload_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let payload_end = opens
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(body.len());
        events.push(RawSyncEvent {
            start_ms,
            raw_html: unwrap_payload(&body[payload_start..payload_end]),
        });
    }
    Ok(events)
}

/// Parse a SAMI document into caption segments ordered by start time.
///
/// Clearing events are returned as blank segments; the last segment has no
/// end. A document without a body or without SYNC events decodes to an empty
/// list.
pub fn parse_sami(document: &str) -> Result<Vec<CaptionSegment>> {
    let Some(body) = body_of(document) else {
        warn!("SAMI document has no <BODY> section");
        return Ok(Vec::new());
    };

    let mut events = extract_events(body)?;
    if events.is_empty() {
        warn!("No <SYNC> events found in SAMI body");
        return Ok(Vec::new());
    }

    // Stable: equal start times keep document order.
    events.sort_by_key(|e| e.start_ms);

    let segments: Vec<CaptionSegment> = events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let end_time_ms = events.get(i + 1).map(|next| next.start_ms);
            CaptionSegment {
                start_time_ms: event.start_ms,
                end_time_ms,
                duration_ms: end_time_ms.map(|end| end - event.start_ms),
                text: clean_payload(event.raw_html),
            }
        })
        .collect();

    debug!("Decoded {} SYNC events", segments.len());
    Ok(segments)
}
