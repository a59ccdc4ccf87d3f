// Shared test helpers for running a gateway and talking Gopher to it.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use gopher_gateway::{CharsetPolicy, Config, GatewayContext, GatewayStats, GopherServer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A gateway running on an ephemeral local port.
#[allow(dead_code)] // Not every test file uses every field
pub struct TestGateway {
    pub addr: SocketAddr,
    pub stats: Arc<GatewayStats>,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<anyhow::Result<()>>,
}

/// Starts a gateway on 127.0.0.1 with an ephemeral port.
///
/// The advertised identity is the bound address, so link lines point at this
/// very server.
#[allow(dead_code)]
pub async fn start_gateway(root_page: Option<PathBuf>, charset: CharsetPolicy) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    let mut config = Config {
        listen_address: addr.to_string(),
        charset,
        timeout_seconds: 5,
        ..Default::default()
    };
    if let Some(root_page) = root_page {
        config.root_page = root_page;
    }

    let client = gopher_gateway::initialization::init_client(&config)
        .expect("Failed to build HTTP client");
    let context = GatewayContext::new(&config, client).expect("Failed to build context");
    let stats = context.stats().clone();

    let shutdown = CancellationToken::new();
    let server = GopherServer::new(listener, context);
    let handle = tokio::spawn(server.serve(shutdown.clone()));

    TestGateway {
        addr,
        stats,
        shutdown,
        handle,
    }
}

/// Sends `selector` and returns the raw response bytes.
#[allow(dead_code)]
pub async fn gopher_request_bytes(addr: SocketAddr, selector: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr)
        .await
        .expect("Failed to connect to gateway");
    stream
        .write_all(format!("{selector}\r\n").as_bytes())
        .await
        .expect("Failed to send selector");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("Failed to read response");
    response
}

/// Sends `selector` and returns the response as UTF-8 text.
#[allow(dead_code)]
pub async fn gopher_request(addr: SocketAddr, selector: &str) -> String {
    String::from_utf8(gopher_request_bytes(addr, selector).await)
        .expect("Response is not valid UTF-8")
}

/// Address of a local port nothing listens on.
#[allow(dead_code)]
pub fn closed_port_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    addr
}
