//! Main application modules.
//!
//! Startup banner, shutdown signal handling and statistics printing used by
//! the gateway runner.

pub mod shutdown;
pub mod statistics;

use crate::config::GatewayIdentity;

// Re-export public API
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::print_gateway_statistics;

/// Line printed at startup telling users how to reach the gateway.
pub fn startup_banner(identity: &GatewayIdentity) -> String {
    format!(
        "Server starting, use (e.g.) gopher://{}/1www.wikipedia.org/",
        identity.connect_address()
    )
}
