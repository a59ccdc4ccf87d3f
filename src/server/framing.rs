//! Selector framing and response termination.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::config::RESPONSE_TERMINATOR;

/// Why a selector line could not be read.
#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("selector longer than {limit} bytes")]
    TooLong { limit: usize },

    #[error("no selector received within {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("failed to read selector: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one selector line.
///
/// The line ends at `\n` (an optional preceding `\r` is dropped) or at end of
/// stream. Returns `Ok(None)` if the client closed the connection without
/// sending anything. Invalid UTF-8 is replaced, not rejected.
///
/// # Errors
///
/// `SelectorError::TooLong` if `limit` bytes arrive without a line break,
/// `SelectorError::Timeout` if the line is not complete within `timeout`.
pub async fn read_selector<R>(
    reader: &mut R,
    limit: usize,
    timeout: Duration,
) -> Result<Option<String>, SelectorError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = tokio::time::timeout(
        timeout,
        reader.take(limit as u64).read_until(b'\n', &mut buf),
    )
    .await
    .map_err(|_| SelectorError::Timeout { timeout })??;

    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if read >= limit {
        return Err(SelectorError::TooLong { limit });
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Whether a response body still needs the closing `.` line.
pub fn needs_terminator(body: &[u8]) -> bool {
    !body.ends_with(RESPONSE_TERMINATOR.as_bytes())
}
