//! Outbound request headers.

/// Request headers sent with every fetch.
///
/// The gateway can only render HTML and text, so it says so up front; servers
/// doing content negotiation then prefer a representation we can use.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    const ACCEPT: &'static str = "text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.5";
    const ACCEPT_LANGUAGE: &'static str = "en-US,en;q=0.9";

    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::ACCEPT, Self::ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, Self::ACCEPT_LANGUAGE)
    }
}
