//! Graceful shutdown handling.

use log::{error, info};
use tokio_util::sync::CancellationToken;

/// Cancels `shutdown` when the process receives Ctrl-C.
///
/// Returns the task waiting for the signal; it also ends if `shutdown` is
/// cancelled by someone else first.
pub fn cancel_on_ctrl_c(shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        info!("Received Ctrl-C, shutting down");
                        shutdown.cancel();
                    }
                    Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
                }
            }
            _ = shutdown.cancelled() => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watcher_ends_when_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let watcher = cancel_on_ctrl_c(token.clone());
        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(5), watcher)
            .await
            .expect("watcher should stop")
            .expect("watcher should not panic");
    }
}
