//! Configuration file support
//!
//! Loads caption configuration from TOML files. Every field is optional so a
//! file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CaptionConfig;
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Line splitting and duration estimate
    #[serde(default)]
    pub segmenter: SegmenterSettings,
    /// Event timing and on-screen buffering
    #[serde(default)]
    pub encoder: EncoderSettings,
    /// Document metadata
    #[serde(default)]
    pub document: DocumentSettings,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmenterSettings {
    /// Max characters per display line
    pub chars_per_line_limit: Option<usize>,
    /// Minimum display time (ms)
    pub min_duration_ms: Option<u64>,
    /// Maximum display time (ms)
    pub max_duration_ms: Option<u64>,
    /// Time per character (ms)
    pub ms_per_char: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Gap between consecutive lines (ms)
    pub gap_between_syncs_ms: Option<u64>,
    /// Lines shown together before a reset
    pub cumulative_lines_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub title: Option<String>,
    pub class_name: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Some("pretty".to_string()),
        }
    }
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file, with every field spelled out
    pub fn default_config() -> Self {
        let defaults = CaptionConfig::default();
        Self {
            segmenter: SegmenterSettings {
                chars_per_line_limit: Some(defaults.chars_per_line_limit),
                min_duration_ms: Some(defaults.min_duration_ms),
                max_duration_ms: Some(defaults.max_duration_ms),
                ms_per_char: Some(defaults.ms_per_char),
            },
            encoder: EncoderSettings {
                gap_between_syncs_ms: Some(defaults.gap_between_syncs_ms),
                cumulative_lines_limit: Some(defaults.cumulative_lines_limit),
            },
            document: DocumentSettings {
                title: Some(defaults.title),
                class_name: Some(defaults.class_name),
                language: Some(defaults.language),
            },
            logging: Some(LoggingSettings::default()),
        }
    }

    /// Logging settings, defaulted when the section is absent
    pub fn logging(&self) -> LoggingSettings {
        self.logging.clone().unwrap_or_default()
    }

    /// Convert to CaptionConfig
    pub fn into_caption_config(self) -> CaptionConfig {
        let defaults = CaptionConfig::default();
        CaptionConfig {
            chars_per_line_limit: self
                .segmenter
                .chars_per_line_limit
                .unwrap_or(defaults.chars_per_line_limit),
            min_duration_ms: self
                .segmenter
                .min_duration_ms
                .unwrap_or(defaults.min_duration_ms),
            max_duration_ms: self
                .segmenter
                .max_duration_ms
                .unwrap_or(defaults.max_duration_ms),
            ms_per_char: self.segmenter.ms_per_char.unwrap_or(defaults.ms_per_char),
            gap_between_syncs_ms: self
                .encoder
                .gap_between_syncs_ms
                .unwrap_or(defaults.gap_between_syncs_ms),
            cumulative_lines_limit: self
                .encoder
                .cumulative_lines_limit
                .unwrap_or(defaults.cumulative_lines_limit),
            title: self.document.title.unwrap_or(defaults.title),
            class_name: self.document.class_name.unwrap_or(defaults.class_name),
            language: self.document.language.unwrap_or(defaults.language),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
