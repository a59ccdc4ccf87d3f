//! HTML-to-text rendering.
//!
//! The gateway only depends on the [`TextRenderer`] contract: sanitized HTML in,
//! plain text out, with placeholder tokens copied through untouched.

use std::io::Cursor;

use crate::config::RENDER_WIDTH;

/// Converts sanitized HTML into plain text.
pub trait TextRenderer: Send + Sync {
    /// Renders `html` to text lines (without trailing newlines).
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the document cannot be rendered.
    fn render(&self, html: &str) -> Result<Vec<String>, String>;
}

/// [`TextRenderer`] backed by the `html2text` crate.
///
/// Renders at a very large width so that paragraphs stay on one line; the
/// gophermap emitter does its own reflow afterwards. Tables keep their
/// borders. Anchors left in the HTML render as bracketed text with no
/// footnote list.
#[derive(Debug, Clone, Copy)]
pub struct Html2TextRenderer {
    width: usize,
}

impl Html2TextRenderer {
    pub fn new() -> Self {
        Self {
            width: RENDER_WIDTH,
        }
    }
}

impl Default for Html2TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer for Html2TextRenderer {
    fn render(&self, html: &str) -> Result<Vec<String>, String> {
        let text = html2text::config::plain()
            .link_footnotes(false)
            .no_link_wrapping()
            .allow_width_overflow()
            .string_from_read(Cursor::new(html.as_bytes()), self.width)
            .map_err(|e| e.to_string())?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_lines() {
        let lines = Html2TextRenderer::new()
            .render("<p>first</p><p>second</p>")
            .unwrap();
        assert!(lines.iter().any(|l| l == "first"));
        assert!(lines.iter().any(|l| l == "second"));
    }

    #[test]
    fn test_placeholder_survives_rendering() {
        let lines = Html2TextRenderer::new()
            .render("<p>See [About](https://www.example.com/about) now</p>")
            .unwrap();
        assert_eq!(
            lines,
            vec!["See [About](https://www.example.com/about) now".to_string()]
        );
    }

    #[test]
    fn test_long_paragraph_is_not_wrapped() {
        let word = "word ".repeat(100);
        let lines = Html2TextRenderer::new()
            .render(&format!("<p>{}</p>", word.trim_end()))
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].chars().count(), word.trim_end().chars().count());
    }

    #[test]
    fn test_entities_are_decoded() {
        let lines = Html2TextRenderer::new().render("<p>a &amp; b</p>").unwrap();
        assert_eq!(lines, vec!["a & b".to_string()]);
    }

    #[test]
    fn test_leftover_anchor_has_no_footnote() {
        let lines = Html2TextRenderer::new()
            .render(r#"<p>before <a href="http://[oops/">Broken</a> after</p>"#)
            .unwrap();
        assert_eq!(lines, vec!["before [Broken] after".to_string()]);
    }

    #[test]
    fn test_escaped_url_is_decoded_back() {
        let lines = Html2TextRenderer::new()
            .render("<p>[S](https://x.test/s?x=1&amp;copy=2)</p>")
            .unwrap();
        assert_eq!(lines, vec!["[S](https://x.test/s?x=1&copy=2)".to_string()]);
    }

    #[test]
    fn test_empty_document() {
        let lines = Html2TextRenderer::new().render("").unwrap();
        assert!(lines.iter().all(|l| l.trim().is_empty()));
    }
}
