//! Link placeholder tokens.
//!
//! A resolved hyperlink travels through HTML-to-text rendering as a
//! markdown-style `[text](url)` token. The gophermap emitter recognizes it
//! textually once rendering is done.
//!
//! Brackets and parentheses inside the text or URL would end the token early,
//! so they travel as private-use code points and are restored afterwards with
//! [`restore_escaped`]. The token passes through the renderer as HTML text,
//! which is why the URL is entity-escaped too.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const PLACEHOLDER_PATTERN: &str = r"\[([^\]]*)\]\(([^)]*)\)";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(PLACEHOLDER_PATTERN, "PLACEHOLDER_RE"));

/// Compiles a static regex pattern, panicking with a detailed message on failure.
///
/// Only for compile-time constant patterns, where failure is a programming error.
pub(crate) fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

// Stand-ins for the token delimiters, from the Unicode private use area
const ESCAPES: [(char, char); 4] = [
    ('[', '\u{E000}'),
    (']', '\u{E001}'),
    ('(', '\u{E002}'),
    (')', '\u{E003}'),
];

/// Builds the placeholder token for a link.
///
/// `text` is inner markup and is kept as HTML. `url` is plain text and gets
/// `&`, `<` and `>` escaped so the renderer hands it back unchanged.
pub fn format_placeholder(text: &str, url: &str) -> String {
    let text = escape_delimiters(text);
    let url = escape_delimiters(url);
    format!("[{text}]({})", html_escape::encode_text(&url))
}

fn escape_delimiters(s: &str) -> Cow<'_, str> {
    if !s.contains(['[', ']', '(', ')']) {
        return Cow::Borrowed(s);
    }
    let escaped = s
        .chars()
        .map(|c| {
            ESCAPES
                .iter()
                .find(|(plain, _)| *plain == c)
                .map_or(c, |(_, stand_in)| *stand_in)
        })
        .collect();
    Cow::Owned(escaped)
}

/// Puts back the brackets and parentheses [`format_placeholder`] escaped.
pub fn restore_escaped(s: &str) -> Cow<'_, str> {
    if !s.contains(|c: char| ESCAPES.iter().any(|(_, stand_in)| *stand_in == c)) {
        return Cow::Borrowed(s);
    }
    let restored = s
        .chars()
        .map(|c| {
            ESCAPES
                .iter()
                .find(|(_, stand_in)| *stand_in == c)
                .map_or(c, |(plain, _)| *plain)
        })
        .collect();
    Cow::Owned(restored)
}

/// Whether `line` contains at least one placeholder token.
pub fn contains_placeholder(line: &str) -> bool {
    PLACEHOLDER_RE.is_match(line)
}

/// A piece of a rendered line: plain text or a link token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link { text: &'a str, url: &'a str },
}

/// Splits a line into text and link segments, in order.
///
/// Empty text between adjacent tokens is not reported.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(line) {
        let (Some(whole), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&line[last..whole.start()]));
        }
        segments.push(Segment::Link {
            text: text.as_str(),
            url: url.as_str(),
        });
        last = whole.end();
    }
    if last < line.len() {
        segments.push(Segment::Text(&line[last..]));
    }
    segments
}
