//! Stdio JSON-lines transport.
//!
//! Each input line is `{"surface": n, "request": {...}}`; each output line is
//! `{"surface": n, "message": {...}}`. Logs go to stderr, never stdout.

use std::io;
use std::sync::Arc;

use appkit_common::SurfaceId;
use appkit_runtime::{AppRuntime, OutboundMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct InboundLine {
    surface: SurfaceId,
    request: Value,
}

#[derive(Debug, Serialize)]
struct OutboundLine<'a> {
    surface: SurfaceId,
    message: &'a OutboundMessage,
}

/// Dispatch every request line until EOF. Returns how many were dispatched.
pub async fn read_requests<R>(reader: R, runtime: Arc<AppRuntime>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut dispatched = 0;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundLine>(&line) {
            Ok(inbound) => {
                debug!(surface = %inbound.surface, "request line received");
                runtime.dispatch_raw(inbound.surface, &inbound.request.to_string());
                dispatched += 1;
            }
            Err(e) => warn!(error = %e, "ignoring malformed transport line"),
        }
    }
    Ok(dispatched)
}

/// Write every outbound message as one line, flushing after each.
pub async fn write_messages<W>(
    mut outbound: mpsc::UnboundedReceiver<(SurfaceId, OutboundMessage)>,
    mut writer: W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some((surface, message)) = outbound.recv().await {
        let mut line = serde_json::to_vec(&OutboundLine {
            surface,
            message: &message,
        })?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
