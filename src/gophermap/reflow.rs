//! Fixed-width line reflow.

use crate::placeholder::contains_placeholder;

/// Wraps rendered lines to `width` characters.
///
/// A line is kept whole when it fits, or when it carries a link placeholder
/// (splitting could cut the token in half). Every other line is cut into
/// chunks of exactly `width` characters, the last one possibly shorter.
pub fn reflow<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.as_ref();
        if contains_placeholder(line) || line.chars().count() <= width {
            output.push(line.to_string());
        } else {
            output.extend(chunk_chars(line, width));
        }
    }
    output
}

/// Splits `line` into pieces of `width` characters (not bytes).
///
/// Concatenating the pieces gives back `line`. An empty line yields one empty
/// piece.
pub fn chunk_chars(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() || width == 0 {
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
