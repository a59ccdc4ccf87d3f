//! Gophermap emission.
//!
//! Turns rendered text into gophermap records:
//! - lines are first reflowed to the display width (link lines exempt)
//! - every placeholder token becomes its own link record
//! - surrounding text becomes info records
//!
//! Serialization applies the gateway identity to link records and the
//! configured charset to the whole response.

mod display;
mod line;
mod reflow;

use crate::config::{CharsetPolicy, GatewayIdentity, DISPLAY_WIDTH};
use crate::placeholder::{restore_escaped, split_segments, Segment};

pub use display::sanitize_field;
pub use line::GophermapLine;
pub use reflow::{chunk_chars, reflow};

/// An ordered gophermap response body (without the closing `.` line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gophermap {
    lines: Vec<GophermapLine>,
}

impl Gophermap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the gophermap for rendered HTML.
    pub fn from_rendered<S: AsRef<str>>(rendered: &[S]) -> Self {
        let mut map = Self::new();
        for line in reflow(rendered, DISPLAY_WIDTH) {
            map.lines.extend(emit_line(&line));
        }
        map
    }

    /// Builds the gophermap for a plain-text document: one info record per line.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(GophermapLine::info).collect(),
        }
    }

    /// A response made of a single record.
    pub fn single(line: GophermapLine) -> Self {
        Self { lines: vec![line] }
    }

    pub fn push(&mut self, line: GophermapLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[GophermapLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of link records.
    pub fn link_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, GophermapLine::Link { .. }))
            .count()
    }

    /// Serializes every record, CRLF-terminated, as Unicode text.
    pub fn to_text(&self, identity: &GatewayIdentity) -> String {
        let mut out = String::new();
        for line in &self.lines {
            line.write_to(&mut out, identity);
        }
        out
    }

    /// Serializes and encodes the response for the wire.
    pub fn to_bytes(&self, identity: &GatewayIdentity, charset: CharsetPolicy) -> Vec<u8> {
        charset.encode(&self.to_text(identity)).into_owned()
    }
}

/// Converts one reflowed line into records.
///
/// Lines without a placeholder become a single info record, verbatim. Lines
/// with placeholders yield one link record per token, with the text around
/// them as info records when it is not blank. Link text and selector get their
/// escaped brackets and parentheses back.
pub fn emit_line(line: &str) -> Vec<GophermapLine> {
    let segments = split_segments(line);
    if !segments.iter().any(|s| matches!(s, Segment::Link { .. })) {
        return vec![GophermapLine::info(line)];
    }

    segments
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Text(text) if text.trim().is_empty() => None,
            Segment::Text(text) => Some(GophermapLine::info(text)),
            Segment::Link { text, url } => {
                let text = restore_escaped(text);
                let url = restore_escaped(url);
                Some(GophermapLine::link(link_text(&text, &url), &*url))
            }
        })
        .collect()
}

/// Display text for a link; an anchor without visible text shows its URL.
fn link_text<'a>(text: &'a str, url: &'a str) -> &'a str {
    let text = text.trim();
    if text.is_empty() {
        url
    } else {
        text
    }
}
