//! Configuration constants.
//!
//! This module defines the constants used throughout the gateway, including
//! wire-format markers, display limits, and network defaults.

use std::time::Duration;

/// Default `host:port` (or `:port`) the gateway listens on.
pub const DEFAULT_LISTEN_ADDRESS: &str = ":7000";

/// Host prepended to a listen address that starts with `:`, so links have a
/// concrete host to point back at.
pub const DEFAULT_CONNECT_HOST: &str = "localhost";

/// Static gophermap served for the root selector.
pub const DEFAULT_ROOT_PAGE: &str = "request.gopher";

/// Default charset label applied to the outgoing gophermap.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Outbound HTTP client timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for outbound HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("gopher_gateway/", env!("CARGO_PKG_VERSION"));

/// Maximum display width, in characters, of a non-link gophermap line.
///
/// Lines longer than this are split into chunks of exactly this many
/// characters. Lines carrying a link are never split.
pub const DISPLAY_WIDTH: usize = 59;

/// Width handed to the HTML-to-text renderer.
///
/// Deliberately huge: the renderer must not wrap lines itself, because a wrap
/// inside a link placeholder would break link rewriting. Wrapping happens later
/// in the reflow stage.
pub const RENDER_WIDTH: usize = 10_000;

// Gophermap wire format
/// Item type for a non-navigable information line
pub const ITEM_TYPE_INFO: char = 'i';
/// Item type for a directory/menu entry (used for rewritten links)
pub const ITEM_TYPE_MENU: char = '1';
/// Item type for an error line
pub const ITEM_TYPE_ERROR: char = '3';
/// Filler used for the selector/host/port fields of info lines
pub const INFO_FIELD_PLACEHOLDER: &str = "-";
/// Selector used on error lines
pub const ERROR_SELECTOR: &str = "Error";
/// Host used on error lines
pub const ERROR_HOST: &str = "error.host";
/// Port used on error lines
pub const ERROR_PORT: u16 = 1;
/// Line terminator of the Gopher protocol
pub const LINE_TERMINATOR: &str = "\r\n";
/// Sequence closing a gophermap response
pub const RESPONSE_TERMINATOR: &str = ".\r\n";

// Server limits
/// Maximum accepted selector length in bytes (including the terminator)
pub const MAX_SELECTOR_LENGTH: usize = 4096;
/// Time allowed for a client to send its selector line
pub const SELECTOR_READ_TIMEOUT: Duration = Duration::from_secs(30);
