//! gopher_gateway library: serve the web to Gopher clients
//!
//! Every Gopher selector is treated as a web address. The page is fetched,
//! converted to plain text, wrapped to a fixed width and returned as a
//! gophermap whose links point back at the gateway, so following a link
//! fetches the next page through the gateway again.
//!
//! # Example
//!
//! ```no_run
//! use gopher_gateway::{run_gateway, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     listen_address: "127.0.0.1:7070".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_gateway(config, CancellationToken::new()).await?;
//! println!("Served {} requests", report.pages_served + report.errors);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod classify;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod gophermap;
pub mod initialization;
pub mod pipeline;
pub mod placeholder;
pub mod render;
pub mod sanitize;
pub mod selector;
pub mod server;

// Re-export public API
pub use config::{CharsetPolicy, Config, GatewayIdentity, LogFormat, LogLevel};
pub use error_handling::{GatewayError, GatewayStats};
pub use pipeline::GatewayContext;
pub use run::{run_gateway, GatewayReport};
pub use server::GopherServer;

// Internal run module (wires configuration, client, pipeline and server)
mod run {
    use anyhow::{Context, Result};
    use log::info;
    use std::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::app::{print_gateway_statistics, startup_banner};
    use crate::config::Config;
    use crate::initialization::init_client;
    use crate::pipeline::GatewayContext;
    use crate::server::GopherServer;

    /// Summary of a gateway run, returned after shutdown.
    #[derive(Debug, Clone)]
    pub struct GatewayReport {
        /// Responses served successfully (pages and root page)
        pub pages_served: usize,
        /// Requests that ended with an error reply
        pub errors: usize,
        /// Time the server was up, in seconds
        pub uptime_seconds: f64,
    }

    /// Runs the gateway until `shutdown` is cancelled.
    ///
    /// Builds the HTTP client and request context from `config`, binds the
    /// listen address, prints the startup banner and serves connections.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The listen address has no valid port
    /// - The HTTP client cannot be built
    /// - The listen address cannot be bound
    pub async fn run_gateway(config: Config, shutdown: CancellationToken) -> Result<GatewayReport> {
        let start_time = Instant::now();

        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let context =
            GatewayContext::new(&config, client).context("Failed to build gateway identity")?;
        let stats = context.stats().clone();

        info!(
            "Root page: {}, output charset: {}, TLS verification: {}",
            config.root_page.display(),
            config.charset.name(),
            if config.no_security { "off" } else { "on" }
        );
        println!("{}", startup_banner(context.identity()));

        let server = GopherServer::bind(&config.bind_address(), context)
            .await
            .context("Failed to start Gopher server")?;
        server.serve(shutdown).await?;

        let uptime_seconds = start_time.elapsed().as_secs_f64();
        print_gateway_statistics(&stats, uptime_seconds);

        Ok(GatewayReport {
            pages_served: stats.total_info(),
            errors: stats.total_errors(),
            uptime_seconds,
        })
    }
}
