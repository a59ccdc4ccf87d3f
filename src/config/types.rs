//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration, plus the gateway identity derived from the listen address.

use std::borrow::Cow;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use encoding_rs::Encoding;

use crate::config::constants::{
    DEFAULT_CHARSET, DEFAULT_CONNECT_HOST, DEFAULT_LISTEN_ADDRESS, DEFAULT_ROOT_PAGE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Charset applied to the gophermap when it is written to the wire.
///
/// All text processing happens in Unicode; the policy only decides how the
/// finished response is turned into bytes. UTF-8 passes through untouched,
/// legacy single-byte code pages (e.g. `ibm866`) are opt-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharsetPolicy {
    encoding: &'static Encoding,
}

impl CharsetPolicy {
    /// Looks up a policy by WHATWG encoding label (`utf-8`, `ibm866`, `latin1`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(|encoding| Self { encoding })
    }

    /// `clap` value parser for `--charset`.
    pub fn parse(label: &str) -> Result<Self, String> {
        Self::from_label(label).ok_or_else(|| format!("unknown charset label: {label}"))
    }

    /// Canonical name of the configured encoding.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encodes `text` for the wire.
    ///
    /// Characters the target encoding cannot represent are written as numeric
    /// character references.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        if self.encoding == encoding_rs::UTF_8 {
            return Cow::Borrowed(text.as_bytes());
        }
        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            log::trace!(
                "Some characters are not representable in {}",
                self.encoding.name()
            );
        }
        bytes
    }
}

impl Default for CharsetPolicy {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Host and port every rewritten link points back at.
///
/// Built once at startup from the listen address and shared read-only by all
/// requests, so a followed link re-enters this same gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayIdentity {
    /// Host name or address advertised in link lines
    pub host: String,
    /// Port advertised in link lines
    pub port: u16,
}

impl GatewayIdentity {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Derives the identity from a `host:port` or `:port` listen address.
    ///
    /// A bare `:port` is advertised as `localhost:port`. The split happens at
    /// the last `:` so bracketed IPv6 hosts keep their colons.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ListenAddressError` if there is no `:`
    /// or the port is not a valid `u16`.
    pub fn from_listen_address(listen_address: &str) -> Result<Self, InitializationError> {
        let connect_address = connect_address(listen_address);
        let (host, port) = connect_address.rsplit_once(':').ok_or_else(|| {
            InitializationError::ListenAddressError(format!(
                "missing port in listen address '{listen_address}'"
            ))
        })?;
        let port = port.parse::<u16>().map_err(|e| {
            InitializationError::ListenAddressError(format!(
                "invalid port in listen address '{listen_address}': {e}"
            ))
        })?;
        Ok(Self::new(host, port))
    }

    /// `host:port` form, as used in `gopher://` URLs.
    pub fn connect_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Listen address with the default host filled in for the `:port` form.
pub fn connect_address(listen_address: &str) -> String {
    if listen_address.starts_with(':') {
        format!("{DEFAULT_CONNECT_HOST}{listen_address}")
    } else {
        listen_address.to_string()
    }
}

/// Gateway configuration.
///
/// Parsed from the command line by the binary, or constructed
/// programmatically (see `Default`) by tests and embedders.
///
/// # Examples
///
/// ```no_run
/// use gopher_gateway::Config;
///
/// let config = Config {
///     listen_address: "127.0.0.1:7070".to_string(),
///     no_security: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gopher_gateway",
    version,
    about = "Serve web pages to Gopher clients as gophermaps"
)]
pub struct Config {
    /// :port or address:port to listen on
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// Skip checking TLS certificates of fetched pages
    #[arg(long)]
    pub no_security: bool,

    /// Gophermap served for the root selector
    #[arg(long, default_value = DEFAULT_ROOT_PAGE)]
    pub root_page: PathBuf,

    /// Charset of the gophermaps sent to clients (e.g. utf-8, ibm866)
    #[arg(long, default_value = DEFAULT_CHARSET, value_parser = CharsetPolicy::parse)]
    pub charset: CharsetPolicy,

    /// Outbound HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// Identity advertised in link lines, derived from `listen_address`.
    pub fn identity(&self) -> Result<GatewayIdentity, InitializationError> {
        GatewayIdentity::from_listen_address(&self.listen_address)
    }

    /// Socket address to bind; `:port` binds every IPv4 interface.
    pub fn bind_address(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            no_security: false,
            root_page: PathBuf::from(DEFAULT_ROOT_PAGE),
            charset: CharsetPolicy::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
