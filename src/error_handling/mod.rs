//! Error handling and request statistics.
//!
//! This module provides:
//! - The per-request error taxonomy (`GatewayError`) and startup errors
//! - Categorization of HTTP client failures
//! - Thread-safe counters of served pages and errors
//!
//! Every `GatewayError` is terminal for its own request only; the server keeps
//! running and other requests are unaffected.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::GatewayStats;
pub use types::{error_chain, ErrorType, GatewayError, InfoType, InitializationError};
