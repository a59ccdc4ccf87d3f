//! Content classification.
//!
//! A gophermap may only contain info and selector lines, so the declared MIME
//! type decides whether a resource can be shown at all.

/// How a fetched resource is going to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// Full sanitize → render → reflow pipeline.
    Html,
    /// Already plain text: every line becomes an info line as-is.
    PlainText,
    /// Binary or otherwise unrepresentable; rejected with a message.
    Unsupported,
}

/// Classifies a declared MIME type.
///
/// | MIME type                       | Class         |
/// |---------------------------------|---------------|
/// | empty, or contains `html`       | `Html`        |
/// | starts with `text/`             | `PlainText`   |
/// | anything else                   | `Unsupported` |
///
/// Servers that omit `Content-Type` are assumed to serve HTML. Matching
/// ignores ASCII case, as MIME types do.
pub fn classify(mime_type: &str) -> ContentClass {
    let mime_type = mime_type.to_ascii_lowercase();
    if mime_type.is_empty() || mime_type.contains("html") {
        ContentClass::Html
    } else if mime_type.starts_with("text/") {
        ContentClass::PlainText
    } else {
        ContentClass::Unsupported
    }
}
