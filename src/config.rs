//! Caption configuration
//!
//! Every tunable of the segmenter and encoder lives in one record that is
//! passed explicitly; nothing falls back to hidden module defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CaptionError, Result};

/// Tunables for segmenting a story and encoding it as a SAMI document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Max characters per display line, separators included
    pub chars_per_line_limit: usize,

    /// Minimum display time of a line in milliseconds
    pub min_duration_ms: u64,

    /// Maximum display time of a line in milliseconds
    pub max_duration_ms: u64,

    /// Display time allotted per character
    pub ms_per_char: u64,

    /// Gap between the end of one line and the start of the next
    pub gap_between_syncs_ms: u64,

    /// Number of lines shown together before the screen is cleared
    pub cumulative_lines_limit: usize,

    /// Document title written into `<TITLE>`
    pub title: String,

    /// Paragraph class attached to every event
    pub class_name: String,

    /// Language tag for the class style rule
    pub language: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            chars_per_line_limit: 30,
            min_duration_ms: 1500,
            max_duration_ms: 7000,
            ms_per_char: 120,
            gap_between_syncs_ms: 200,
            cumulative_lines_limit: 4,
            title: "Generated Subtitle".to_string(),
            class_name: "KRCC".to_string(),
            language: "ko-KR".to_string(),
        }
    }
}

impl CaptionConfig {
    /// Reject parameter combinations that would yield nonsensical timing
    pub fn validate(&self) -> Result<()> {
        if self.chars_per_line_limit == 0 {
            return Err(CaptionError::Config(
                "chars_per_line_limit must be at least 1".to_string(),
            ));
        }
        if self.min_duration_ms == 0 {
            return Err(CaptionError::Config(
                "min_duration_ms must be at least 1".to_string(),
            ));
        }
        if self.min_duration_ms > self.max_duration_ms {
            return Err(CaptionError::Config(format!(
                "min_duration_ms ({}) exceeds max_duration_ms ({})",
                self.min_duration_ms, self.max_duration_ms
            )));
        }
        // A clear marker needs one free millisecond on each side inside the gap.
        if self.gap_between_syncs_ms < 2 {
            return Err(CaptionError::Config(format!(
                "gap_between_syncs_ms must be at least 2, got {}",
                self.gap_between_syncs_ms
            )));
        }
        if self.cumulative_lines_limit == 0 {
            return Err(CaptionError::Config(
                "cumulative_lines_limit must be at least 1".to_string(),
            ));
        }
        if self.class_name.is_empty()
            || !self
                .class_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CaptionError::Config(format!(
                "class_name {:?} is not a valid class identifier",
                self.class_name
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: CaptionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
