//! SAMI document encoder
//!
//! Walks the timed lines once, assigning each a start time, an end time and a
//! clearing event that lands inside the gap before the next line.

use tracing::{debug, warn};

use super::escape::{escape_text, BLANK_MARKER, LINE_BREAK};
use crate::config::CaptionConfig;
use crate::error::{CaptionError, Result};
use crate::segment::TimedLine;

/// Lines currently on screen.
///
/// Holds at most `limit` escaped lines. Pushing onto a full buffer clears it
/// first, so the screen starts over with a single line instead of scrolling.
#[derive(Debug, Clone)]
pub struct VisibleLineBuffer {
    lines: Vec<String>,
    limit: usize,
}

impl VisibleLineBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Add an escaped line, resetting the buffer if it is full
    pub fn push(&mut self, line: String) {
        if self.lines.len() >= self.limit {
            self.lines.clear();
        }
        self.lines.push(line);
    }

    /// Visible lines joined with the line break marker
    pub fn render(&self) -> String {
        self.lines.join(LINE_BREAK)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What a synchronization event shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Escaped cumulative text, lines joined by `<br>`
    Content(String),
    /// Blank marker that clears the screen
    Clear,
}

/// One emitted synchronization point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEvent {
    /// Start time in milliseconds
    pub start_ms: u64,
    pub payload: EventPayload,
}

impl CaptionEvent {
    /// Markup written inside the event's paragraph
    pub fn display_text(&self) -> &str {
        match &self.payload {
            EventPayload::Content(text) => text,
            EventPayload::Clear => BLANK_MARKER,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.payload == EventPayload::Clear
    }
}

/// Timestamp of the clearing event that follows a line ending at `end_ms`.
///
/// Between lines the clear lands half a gap before the next start, always
/// strictly between `end_ms` and `end_ms + gap_ms` when the gap allows it.
/// After the last line it follows the end by one millisecond.
pub fn clear_time_ms(end_ms: u64, gap_ms: u64, is_last: bool) -> Option<u64> {
    let after_end = end_ms.checked_add(1)?;
    if is_last {
        return Some(after_end);
    }

    let next_start = end_ms.checked_add(gap_ms)?;
    let offset = if gap_ms > 1 { gap_ms / 2 } else { 1 };
    let mut clear = after_end.max(next_start.saturating_sub(offset));
    if clear >= next_start {
        clear = next_start.saturating_sub(1);
    }
    if clear <= end_ms {
        clear = after_end;
    }
    Some(clear)
}

/// Encoder for turning timed lines into a SAMI document
#[derive(Debug)]
pub struct SamiEncoder<'a> {
    config: &'a CaptionConfig,
}

impl<'a> SamiEncoder<'a> {
    /// Create an encoder, rejecting unusable tuning parameters
    pub fn new(config: &'a CaptionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute the ordered content and clearing events for `lines`.
    ///
    /// Every line yields exactly one content event followed by one clearing
    /// event. The first line starts one gap after time zero. Fails if a
    /// timestamp would not fit in `u64` milliseconds.
    pub fn plan(&self, lines: &[TimedLine]) -> Result<Vec<CaptionEvent>> {
        let gap = self.config.gap_between_syncs_ms;
        let mut events = Vec::with_capacity(lines.len() * 2);
        let mut buffer = VisibleLineBuffer::new(self.config.cumulative_lines_limit);
        let mut current_ms = gap;

        for (i, line) in lines.iter().enumerate() {
            buffer.push(escape_text(&line.text));

            let overflow = || CaptionError::TimingOverflow { line: i };
            let start_ms = current_ms;
            let end_ms = start_ms.checked_add(line.duration_ms).ok_or_else(overflow)?;
            events.push(CaptionEvent {
                start_ms,
                payload: EventPayload::Content(buffer.render()),
            });

            let is_last = i + 1 == lines.len();
            events.push(CaptionEvent {
                start_ms: clear_time_ms(end_ms, gap, is_last).ok_or_else(overflow)?,
                payload: EventPayload::Clear,
            });

            current_ms = end_ms.checked_add(gap).ok_or_else(overflow)?;
        }

        Ok(events)
    }

    /// Encode `lines` into a complete SAMI document.
    ///
    /// No lines yields a document with an empty body.
    pub fn encode(&self, lines: &[TimedLine]) -> Result<String> {
        if lines.is_empty() {
            warn!(
                "No content to convert to captions for {:?}",
                self.config.title
            );
        }

        let events = self.plan(lines)?;
        let mut output = self.header();
        for event in &events {
            output.push_str(&format!(
                "<SYNC Start={}><P Class={}>{}</P></SYNC>\n",
                event.start_ms,
                self.config.class_name,
                event.display_text()
            ));
        }
        output.push_str("</BODY>\n</SAMI>\n");

        debug!(
            "Encoded {} lines into {} SYNC events ({} bytes)",
            lines.len(),
            events.len(),
            output.len()
        );
        Ok(output)
    }

    fn header(&self) -> String {
        let language = escape_text(&self.config.language);
        let mut output = String::new();
        output.push_str("<SAMI>\n");
        output.push_str("<HEAD>\n");
        output.push_str(&format!(
            "<TITLE>{}</TITLE>\n",
            escape_text(&self.config.title)
        ));
        output.push_str("<STYLE TYPE=\"text/css\">\n");
        output.push_str("<!--\n");
        output.push_str("P { text-align: center; }\n");
        output.push_str(&format!(
            ".{} {{ Name: {}; lang: {}; SAMIType: CC; }}\n",
            self.config.class_name, language, language
        ));
        output.push_str("-->\n");
        output.push_str("</STYLE>\n");
        output.push_str("</HEAD>\n");
        output.push_str("<BODY>\n");
        output
    }
}

/// Compute events for `lines` under `config`
pub fn plan_events(lines: &[TimedLine], config: &CaptionConfig) -> Result<Vec<CaptionEvent>> {
    SamiEncoder::new(config)?.plan(lines)
}

/// Encode `lines` into a SAMI document under `config`
pub fn encode_sami(lines: &[TimedLine], config: &CaptionConfig) -> Result<String> {
    SamiEncoder::new(config)?.encode(lines)
}
