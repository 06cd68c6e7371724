//! Story segmentation module
//!
//! This module turns raw story text into display lines:
//! - Sentence splitting on terminal punctuation and newline runs
//! - Greedy word wrap bounded by a character limit
//! - Character-count display duration estimate, clamped to a window

pub mod segmenter;

pub use segmenter::{segment_story, split_sentences, wrap_sentence, TimedLine};
