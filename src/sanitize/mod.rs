//! HTML sanitizing and link extraction.
//!
//! Prepares raw HTML for text rendering: drops `<script>` elements, turns
//! non-breaking spaces into ordinary spaces and rewrites anchors into
//! placeholder tokens (see [`crate::placeholder`]). Purely textual; the
//! document is never parsed into a tree here, and this step cannot fail.

mod links;

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::placeholder::compile_regex_unsafe;

pub use links::rewrite_anchors;

const SCRIPT_PATTERN: &str = r"(?is)<script[^>]*>.*?</script>";
const NBSP_PATTERN: &str = r"(?i)&nbsp;|&#0*160;|&#x0*a0;|\x{A0}";

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(SCRIPT_PATTERN, "SCRIPT_RE"));
static NBSP_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(NBSP_PATTERN, "NBSP_RE"));

/// Sanitizes `html` fetched from `base`.
///
/// Steps run in order: script removal, non-breaking space normalization,
/// anchor rewriting. Relative links are resolved against `base`.
pub fn sanitize_html(html: &str, base: &Url) -> String {
    let without_scripts = strip_scripts(html);
    let normalized = normalize_nbsp(&without_scripts);
    let (rewritten, links) = rewrite_anchors(&normalized, base);
    log::debug!("Sanitized HTML from {base}: {links} link(s) rewritten");
    rewritten
}

/// Removes every `<script ...>...</script>` element, content included.
///
/// An unterminated `<script>` is left alone.
pub fn strip_scripts(html: &str) -> String {
    SCRIPT_RE.replace_all(html, "").into_owned()
}

/// Replaces non-breaking spaces (entity or literal) with a plain space.
pub fn normalize_nbsp(html: &str) -> String {
    NBSP_RE.replace_all(html, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/").unwrap()
    }

    #[test]
    fn test_strip_scripts() {
        let html = "<p>a</p><script>alert(1)</script><p>b</p>";
        assert_eq!(strip_scripts(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_strip_scripts_multiline_and_attributes() {
        let html = "x<SCRIPT type=\"text/javascript\">\nvar a = '<p>';\n</Script>y";
        assert_eq!(strip_scripts(html), "xy");
    }

    #[test]
    fn test_strip_scripts_is_non_greedy() {
        let html = "<script>a</script>keep<script>b</script>";
        assert_eq!(strip_scripts(html), "keep");
    }

    #[test]
    fn test_unterminated_script_is_kept() {
        let html = "<p>a</p><script>var x = 1;";
        assert_eq!(strip_scripts(html), html);
    }

    #[test]
    fn test_normalize_nbsp_forms() {
        assert_eq!(normalize_nbsp("a&nbsp;b"), "a b");
        assert_eq!(normalize_nbsp("a&NBSP;b"), "a b");
        assert_eq!(normalize_nbsp("a&#160;b"), "a b");
        assert_eq!(normalize_nbsp("a&#xA0;b"), "a b");
        assert_eq!(normalize_nbsp("a\u{A0}b"), "a b");
        assert_eq!(normalize_nbsp("a&amp;b"), "a&amp;b");
    }

    #[test]
    fn test_sanitize_html_full() {
        let html = "<p>Hi&nbsp;there <a href=\"/about\">About</a></p><script>x()</script>";
        assert_eq!(
            sanitize_html(html, &base()),
            "<p>Hi there [About](https://www.example.com/about)</p>"
        );
    }

    #[test]
    fn test_anchor_inside_script_is_dropped_with_script() {
        let html = "<script>document.write('<a href=\"/x\">x</a>')</script><p>ok</p>";
        assert_eq!(sanitize_html(html, &base()), "<p>ok</p>");
    }

    #[test]
    fn test_nbsp_inside_anchor_text() {
        let html = "<a href=\"/a\">One&nbsp;Two</a>";
        assert_eq!(
            sanitize_html(html, &base()),
            "[One Two](https://www.example.com/a)"
        );
    }
}
