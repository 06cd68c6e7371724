//! SAMI caption codec
//!
//! This module converts between timed lines and SAMI documents:
//! - Entity escaping of payload text and its inverse
//! - Encoding with computed start and clear timestamps and a cumulative
//!   on-screen line buffer
//! - Decoding back into contiguous caption segments
//!
//! The encoder and decoder share only the document format; neither calls the
//! other.

pub mod decoder;
pub mod encoder;
pub mod escape;

pub use decoder::{parse_sami, CaptionSegment};
pub use encoder::{encode_sami, plan_events, CaptionEvent, EventPayload, SamiEncoder, VisibleLineBuffer};
