//! Payload text escaping
//!
//! SAMI payloads are HTML fragments. Only `&`, `<` and `>` are escaped on the
//! way out; on the way in, `<br>` becomes a newline, other tags are dropped and
//! the entities are decoded, with `&nbsp;` turning into a plain space.

use std::borrow::Cow;

/// Line break marker placed between cumulative lines
pub const LINE_BREAK: &str = "<br>";

/// Payload of a clearing event
pub const BLANK_MARKER: &str = "&nbsp;";

/// Escape reserved markup characters. `&` goes first so the entities
/// produced for `<` and `>` are not escaped twice.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Decode the entities produced by [`escape_text`] plus `&nbsp;`.
///
/// Single pass, so `&amp;lt;` decodes to the literal `&lt;`.
pub fn unescape_entities(text: &str) -> Cow<'_, str> {
    regex!(r"&(amp|lt|gt|nbsp);").replace_all(text, |caps: &regex::Captures| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            _ => " ",
        }
    })
}

/// Turn a raw SYNC payload into display text.
///
/// Line breaks become `\n`, remaining tags are stripped, entities decoded and
/// the result trimmed. Tags are stripped before decoding so escaped angle
/// brackets survive as literal text.
pub fn clean_payload(html: &str) -> String {
    let text = regex!(r"(?i)<br\s*/?>").replace_all(html, "\n");
    let text = regex!(r"<[^>]+>").replace_all(&text, "");
    unescape_entities(&text).trim().to_string()
}
