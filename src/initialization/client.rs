//! HTTP client initialization.
//!
//! The gateway builds exactly one client at startup. Its TLS policy is part of
//! the client instance, never process-wide state, so tests can run secure and
//! insecure clients side by side.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the outbound HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Overall request timeout from the config
/// - Redirect following enabled (reqwest default, up to 10 hops)
/// - Certificate verification disabled when `--no-security` is set
///
/// # Arguments
///
/// * `config` - Gateway configuration containing user-agent, timeout and TLS settings
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    if config.no_security {
        log::warn!("TLS certificate verification is disabled (--no-security)");
    }
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(config.no_security)
        .build()?;
    Ok(Arc::new(client))
}
