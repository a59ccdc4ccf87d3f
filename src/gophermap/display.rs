//! Wire-safe display text.
//!
//! Tab separates the fields of a gophermap record and CR/LF ends it, so none
//! of them may appear inside a field.

/// Makes `text` safe to place in a single gophermap field.
///
/// Tabs become spaces. Every other control character (0x00-0x1F and DEL,
/// including CR and LF) is removed. Non-ASCII text is kept as is.
pub fn sanitize_field(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_ascii_control() => None,
            c => Some(c),
        })
        .collect()
}
