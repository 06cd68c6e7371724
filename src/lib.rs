//! Story-to-SAMI caption codec
//!
//! Turns narrative text into a SAMI caption document with computed display
//! windows, and decodes SAMI documents back into contiguous caption segments.

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub mod config;
pub mod config_file;
pub mod error;
pub mod segment;
pub mod subtitle;
pub mod timeline;


pub use config::CaptionConfig;
pub use config_file::ConfigFile;
pub use error::{CaptionError, Result};
pub use segment::{segment_story, TimedLine};
pub use subtitle::{encode_sami, parse_sami, plan_events, CaptionEvent, CaptionSegment, SamiEncoder};
pub use timeline::{displayable, process_story, story_to_sami, CaptionItem};
