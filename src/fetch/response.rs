//! Fetched resource data.

use url::Url;

/// A successfully fetched web resource.
///
/// Owned by a single request; never cached or shared.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The URL that was requested, used as the base for resolving links.
    pub url: Url,
    /// Declared `Content-Type` header value (empty when absent).
    pub mime_type: String,
    /// Full response body.
    pub body: Vec<u8>,
}

impl FetchedResource {
    pub fn new(url: Url, mime_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url,
            mime_type: mime_type.into(),
            body: body.into(),
        }
    }

    /// Body decoded to text.
    ///
    /// Uses the `charset` parameter of the declared MIME type when it names a
    /// known encoding, UTF-8 otherwise. A byte order mark wins over both.
    /// Malformed sequences become U+FFFD.
    pub fn body_text(&self) -> String {
        let encoding = declared_charset(&self.mime_type).unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }
}

/// Encoding named by the `charset=` parameter of a MIME type, if recognized.
fn declared_charset(mime_type: &str) -> Option<&'static encoding_rs::Encoding> {
    mime_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        encoding_rs::Encoding::for_label(value.trim().trim_matches('"').as_bytes())
    })
}

/// Extracts the `Content-Type` header as a string.
///
/// A missing or non-ASCII header yields an empty string, which the classifier
/// treats as HTML.
pub(crate) fn extract_mime_type(headers: &reqwest::header::HeaderMap) -> String {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
