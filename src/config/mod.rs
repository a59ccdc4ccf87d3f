//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (wire format markers, display width, defaults)
//! - CLI option types and parsing
//! - The gateway identity used to route rewritten links back to this server

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{connect_address, CharsetPolicy, Config, GatewayIdentity, LogFormat, LogLevel};
