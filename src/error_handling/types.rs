//! Error type definitions.
//!
//! This module defines the errors that end a request, the errors that stop the
//! gateway from starting, and the counters used for statistics.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use super::categorization::categorize_reqwest_error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The listen address could not be turned into a gateway identity.
    #[error("Listen address error: {0}")]
    ListenAddressError(String),

    /// The listener socket could not be bound.
    #[error("Failed to bind {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that terminate the processing of a single request.
///
/// None of these abort the server: the pipeline logs them and turns them into
/// a one-line reply (see `pipeline::error_reply`).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The resolved target is not a syntactically valid absolute URL.
    #[error("error fetching web resource {url}: {source}")]
    Resolve {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request failed (DNS, connect, TLS, timeout, redirect loop).
    #[error("error fetching web resource {url}: {}", error_chain(.source))]
    Fetch {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The response body could not be read to the end.
    #[error("error reading web resource body: {}", error_chain(.source))]
    BodyRead {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The resource is neither HTML nor text.
    #[error("Not an HTML or text document: {url} (MIME type is {mime_type})")]
    UnsupportedContent { url: String, mime_type: String },

    /// The HTML-to-text renderer failed.
    #[error("error converting html to text: {message}")]
    Render { url: String, message: String },

    /// The static welcome page could not be read.
    #[error("error reading root page {}: {source}", .path.display())]
    RootPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// URL the failing request was about, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            GatewayError::Resolve { url, .. }
            | GatewayError::Fetch { url, .. }
            | GatewayError::BodyRead { url, .. }
            | GatewayError::UnsupportedContent { url, .. }
            | GatewayError::Render { url, .. } => Some(url),
            GatewayError::RootPage { .. } => None,
        }
    }

    /// Statistics bucket for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            GatewayError::Resolve { .. } => ErrorType::InvalidUrl,
            GatewayError::Fetch { source, .. } => categorize_reqwest_error(source),
            GatewayError::BodyRead { .. } => ErrorType::HttpRequestBodyError,
            GatewayError::UnsupportedContent { .. } => ErrorType::UnsupportedContent,
            GatewayError::Render { .. } => ErrorType::RenderError,
            GatewayError::RootPage { .. } => ErrorType::RootPageError,
        }
    }
}

/// Joins an error with all of its sources, outermost first.
///
/// `reqwest` keeps the interesting part (e.g. "dns error: failed to lookup
/// address") several levels down the chain.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

/// Types of errors that can end a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Target URL
    InvalidUrl,
    // HTTP/Network errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    // Content errors
    UnsupportedContent,
    RenderError,
    // Server-side errors
    RootPageError,
}

/// Types of successfully served responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    RootPage,
    HtmlPage,
    PlainTextPage,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => "Invalid target URL",
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::UnsupportedContent => "Unsupported content type",
            ErrorType::RenderError => "HTML rendering error",
            ErrorType::RootPageError => "Root page error",
        }
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::RootPage => "Root page",
            InfoType::HtmlPage => "HTML page",
            InfoType::PlainTextPage => "Plain text page",
        }
    }
}
