//! Anchor rewriting.
//!
//! Every `<a ... href=...>...</a>` element is replaced by a placeholder token
//! carrying its inner markup and its absolute URL.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

use crate::placeholder::{compile_regex_unsafe, format_placeholder};

// Case-insensitive, spans newlines, stops at the first closing </a>
const ANCHOR_PATTERN: &str = r"(?is)<a\s(?:[^>]*\s)?href\s*=[^>]*>.*?</a>";
const HREF_PATTERN: &str = r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']*))"#;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(ANCHOR_PATTERN, "ANCHOR_RE"));
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(HREF_PATTERN, "HREF_RE"));

/// Rewrites every anchor in `html` into a `[text](absolute-url)` token.
///
/// Anchors whose `href` cannot be resolved against `base` are left exactly as
/// they were. Returns the rewritten HTML and the number of anchors rewritten.
pub fn rewrite_anchors(html: &str, base: &Url) -> (String, usize) {
    let mut rewritten = 0;
    let output = ANCHOR_RE.replace_all(html, |caps: &Captures| {
        let anchor = &caps[0];
        match rewrite_anchor(anchor, base) {
            Some(token) => {
                rewritten += 1;
                token
            }
            None => anchor.to_string(),
        }
    });
    (output.into_owned(), rewritten)
}

/// Turns one matched anchor element into a placeholder token.
fn rewrite_anchor(anchor: &str, base: &Url) -> Option<String> {
    // Attribute values are HTML: `&amp;` in a query string means `&`
    let href = html_escape::decode_html_entities(extract_href(anchor)?);
    let target = match base.join(&href) {
        Ok(url) => url,
        Err(e) => {
            log::debug!("Leaving anchor with unresolvable href '{href}' as-is: {e}");
            return None;
        }
    };
    Some(format_placeholder(inner_markup(anchor), target.as_str()))
}

/// Value of the `href` attribute: double-quoted, single-quoted, or bare.
fn extract_href(anchor: &str) -> Option<&str> {
    let caps = HREF_RE.captures(anchor)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// Everything between the end of the opening tag and the closing `</a>`.
fn inner_markup(anchor: &str) -> &str {
    let start = anchor.find('>').map_or(anchor.len(), |i| i + 1);
    let end = anchor.len().saturating_sub("</a>".len()).max(start);
    &anchor[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let (html, count) = rewrite_anchors(r#"<a href="/about">About</a>"#, &base());
        assert_eq!(html, "[About](https://www.example.com/about)");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_document_relative_href() {
        let (html, _) = rewrite_anchors(r#"<a href="other.html">Other</a>"#, &base());
        assert_eq!(html, "[Other](https://www.example.com/dir/other.html)");
    }

    #[test]
    fn test_absolute_href_is_kept() {
        let (html, _) = rewrite_anchors(
            r#"<p>Go <a href="http://other.test/x?y=1">there</a>.</p>"#,
            &base(),
        );
        assert_eq!(html, "<p>Go [there](http://other.test/x?y=1).</p>");
    }

    #[test]
    fn test_attribute_order_and_case() {
        let (html, _) = rewrite_anchors(
            r#"<A class="nav" HREF='/a' title="t">A</A> <a target=_blank href=/b>B</a>"#,
            &base(),
        );
        assert_eq!(
            html,
            "[A](https://www.example.com/a) [B](https://www.example.com/b)"
        );
    }

    #[test]
    fn test_anchor_spanning_lines_with_nested_markup() {
        let (html, _) = rewrite_anchors("<a\nhref=\"/n\"><b>bold\ntext</b></a>", &base());
        assert_eq!(html, "[<b>bold\ntext</b>](https://www.example.com/n)");
    }

    #[test]
    fn test_entities_in_href_are_decoded() {
        let (html, _) = rewrite_anchors(r#"<a href="/s?x=1&amp;y=2">S</a>"#, &base());
        assert_eq!(html, "[S](https://www.example.com/s?x=1&amp;y=2)");
    }

    #[test]
    fn test_bare_ampersand_in_href_survives() {
        let (html, _) = rewrite_anchors(r#"<a href="/s?x=1&copy=2">S</a>"#, &base());
        assert_eq!(html, "[S](https://www.example.com/s?x=1&amp;copy=2)");
    }

    #[test]
    fn test_brackets_in_anchor_text_keep_the_token_intact() {
        let (html, count) = rewrite_anchors(r#"<p>Fact<a href="/cite">[1]</a></p>"#, &base());
        assert_eq!(count, 1);
        assert!(crate::placeholder::contains_placeholder(&html));
        assert_eq!(
            html,
            "<p>Fact[\u{E000}1\u{E001}](https://www.example.com/cite)</p>"
        );
    }

    #[test]
    fn test_parentheses_in_href_keep_the_token_intact() {
        let (html, _) = rewrite_anchors(r#"<a href="/wiki/Foo_(bar)">Foo</a>"#, &base());
        assert_eq!(
            html,
            "[Foo](https://www.example.com/wiki/Foo_\u{E002}bar\u{E003})"
        );
    }

    #[test]
    fn test_unparsable_href_is_left_untouched() {
        let input = r#"<a href="http://[broken/">Broken</a>"#;
        let (html, count) = rewrite_anchors(input, &base());
        assert_eq!(html, input);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let input = r#"<a name="top">Top</a>"#;
        let (html, count) = rewrite_anchors(input, &base());
        assert_eq!(html, input);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_attribute_merely_ending_in_href_is_not_href() {
        // data-href must not be mistaken for href
        let (html, _) = rewrite_anchors(
            r#"<a data-href="/wrong" href="/right">R</a>"#,
            &base(),
        );
        assert_eq!(html, "[R](https://www.example.com/right)");
    }

    #[test]
    fn test_empty_href_points_at_page() {
        let (html, _) = rewrite_anchors(r#"<a href="">Self</a>"#, &base());
        assert_eq!(html, "[Self](https://www.example.com/dir/page.html)");
    }

    #[test]
    fn test_inner_markup() {
        assert_eq!(inner_markup(r#"<a href="x">text</a>"#), "text");
        assert_eq!(inner_markup(r#"<a href="x"></a>"#), "");
    }

    #[test]
    fn test_no_anchors_is_noop() {
        let (html, count) = rewrite_anchors("<p>nothing here</p>", &base());
        assert_eq!(html, "<p>nothing here</p>");
        assert_eq!(count, 0);
    }
}
