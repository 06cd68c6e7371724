//! Display timeline
//!
//! Consumer side of the decoder: drops clearing events and the open-ended
//! tail, and converts the remaining segments into serializable items with
//! ISO-8601 timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CaptionConfig;
use crate::error::Result;
use crate::segment::segment_story;
use crate::subtitle::{encode_sami, parse_sami, CaptionSegment};

/// A caption ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionItem {
    /// Start as an ISO-8601 instant, milliseconds counted from the epoch
    pub start_time: String,
    /// End as an ISO-8601 instant
    pub end_time: String,
    /// Duration in milliseconds, as a decimal string
    pub duration: String,
    pub text: String,
}

/// Millisecond offset rendered as `1970-01-01T00:00:00.000Z` style instant
pub fn offset_to_iso(ms: u64) -> String {
    let ms = i64::try_from(ms).unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Keep segments that have both an end time and visible text
pub fn displayable(segments: &[CaptionSegment]) -> Vec<CaptionSegment> {
    segments
        .iter()
        .filter(|s| s.end_time_ms.is_some() && !s.is_blank())
        .cloned()
        .collect()
}

/// Convert the displayable segments into items; others are skipped
pub fn to_items(segments: &[CaptionSegment]) -> Vec<CaptionItem> {
    displayable(segments)
        .into_iter()
        .filter_map(|s| {
            let end = s.end_time_ms?;
            Some(CaptionItem {
                start_time: offset_to_iso(s.start_time_ms),
                end_time: offset_to_iso(end),
                duration: s.duration_ms.unwrap_or(0).to_string(),
                text: s.text,
            })
        })
        .collect()
}

/// Story text to display items: segment, encode, decode and filter.
///
/// Returns the intermediate SAMI document alongside the items.
pub fn process_story_with_document(
    story: &str,
    config: &CaptionConfig,
) -> Result<(String, Vec<CaptionItem>)> {
    let lines = segment_story(story, config)?;
    let document = encode_sami(&lines, config)?;

    let segments = parse_sami(&document)?;
    debug!("Parsed {} segments before filtering", segments.len());

    let items = to_items(&segments);
    info!(
        "Processed story into {} lines, {} display items",
        lines.len(),
        items.len()
    );
    Ok((document, items))
}

/// Story text to display items
pub fn process_story(story: &str, config: &CaptionConfig) -> Result<Vec<CaptionItem>> {
    process_story_with_document(story, config).map(|(_, items)| items)
}

/// Story text straight to a SAMI document
pub fn story_to_sami(story: &str, config: &CaptionConfig) -> Result<String> {
    encode_sami(&segment_story(story, config)?, config)
}
