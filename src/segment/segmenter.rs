//! Sentence splitting and line wrapping

use tracing::debug;

use crate::config::CaptionConfig;
use crate::error::Result;

/// A width-bounded display line with its computed display duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedLine {
    /// Line text, never empty
    pub text: String,
    /// Display time in milliseconds
    pub duration_ms: u64,
}

impl TimedLine {
    /// Create a timed line with an explicit duration
    pub fn new(text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            duration_ms,
        }
    }

    /// Create a timed line whose duration is estimated from its length
    pub fn estimated(text: String, config: &CaptionConfig) -> Self {
        let duration_ms = estimate_duration_ms(&text, config);
        Self { text, duration_ms }
    }
}

/// Display time for a line: characters times `ms_per_char`, clamped.
///
/// The upper bound wins if the window is inverted.
pub fn estimate_duration_ms(text: &str, config: &CaptionConfig) -> u64 {
    let chars = text.chars().count() as u64;
    chars
        .saturating_mul(config.ms_per_char)
        .max(config.min_duration_ms)
        .min(config.max_duration_ms)
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends after `.`, `?` or `!` followed by whitespace, or at a run
/// of newlines. The punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let boundary = regex!(r"[.?!]\s+|\n+");

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        let end = if m.as_str().starts_with(['.', '?', '!']) {
            m.start() + 1
        } else {
            m.start()
        };
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Greedy word wrap of a single sentence.
///
/// Words are never broken; a word longer than the limit gets a line of its own.
pub fn wrap_sentence(sentence: &str, chars_per_line_limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= chars_per_line_limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a story into timed display lines, in order of appearance.
///
/// Empty or whitespace-only input yields an empty list. Unusable tuning
/// parameters are rejected before any text is looked at.
pub fn segment_story(story: &str, config: &CaptionConfig) -> Result<Vec<TimedLine>> {
    config.validate()?;

    let sentences = split_sentences(story);
    let lines: Vec<TimedLine> = sentences
        .iter()
        .flat_map(|sentence| wrap_sentence(sentence, config.chars_per_line_limit))
        .map(|line| TimedLine::estimated(line, config))
        .collect();

    debug!(
        "Segmented story: {} sentences, {} lines",
        sentences.len(),
        lines.len()
    );
    Ok(lines)
}
