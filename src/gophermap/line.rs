//! Gophermap records and their wire format.

use std::fmt::Write as _;

use crate::config::{
    GatewayIdentity, ERROR_HOST, ERROR_PORT, ERROR_SELECTOR, INFO_FIELD_PLACEHOLDER,
    ITEM_TYPE_ERROR, ITEM_TYPE_INFO, ITEM_TYPE_MENU, LINE_TERMINATOR,
};

use super::display::sanitize_field;

/// One record of a gophermap response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GophermapLine {
    /// Non-navigable text (item type `i`).
    Info(String),
    /// Menu entry pointing back at the gateway (item type `1`); the selector is
    /// the absolute URL to fetch when the link is followed.
    Link { text: String, selector: String },
    /// Error item (item type `3`).
    Error(String),
}

impl GophermapLine {
    pub fn info(text: impl Into<String>) -> Self {
        GophermapLine::Info(text.into())
    }

    pub fn link(text: impl Into<String>, selector: impl Into<String>) -> Self {
        GophermapLine::Link {
            text: text.into(),
            selector: selector.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        GophermapLine::Error(message.into())
    }

    /// Appends the record, CRLF included, to `out`.
    ///
    /// Layout: `<type><display>\t<selector>\t<host>\t<port>\r\n`. Link lines
    /// carry `identity` as host and port; the other kinds use fixed filler.
    pub fn write_to(&self, out: &mut String, identity: &GatewayIdentity) {
        // Writing into a String cannot fail
        let _ = match self {
            GophermapLine::Info(text) => write!(
                out,
                "{ITEM_TYPE_INFO}{}\t{p}\t{p}\t{p}{LINE_TERMINATOR}",
                sanitize_field(text),
                p = INFO_FIELD_PLACEHOLDER
            ),
            GophermapLine::Link { text, selector } => write!(
                out,
                "{ITEM_TYPE_MENU}{}\t{}\t{}\t{}{LINE_TERMINATOR}",
                sanitize_field(text),
                sanitize_field(selector),
                identity.host,
                identity.port
            ),
            GophermapLine::Error(message) => write!(
                out,
                "{ITEM_TYPE_ERROR}{}\t{ERROR_SELECTOR}\t{ERROR_HOST}\t{ERROR_PORT}{LINE_TERMINATOR}",
                sanitize_field(message)
            ),
        };
    }

    /// The record as a standalone string.
    pub fn to_wire(&self, identity: &GatewayIdentity) -> String {
        let mut out = String::new();
        self.write_to(&mut out, identity);
        out
    }
}
