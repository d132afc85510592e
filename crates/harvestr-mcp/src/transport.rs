//! Newline-delimited JSON-RPC transport
//!
//! MCP hosts launch the server as a child process and exchange one JSON
//! message per line over stdin/stdout. Logs must never be written to stdout.

use crate::server::McpServer;
use crate::types::{McpError, McpRequest, McpResponse, RequestId};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading from or writing to the stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Blank lines are skipped. A line that is not a valid request is answered
/// with a parse error carrying a null id. Notifications get no reply.
pub async fn serve<R, W>(
    server: &McpServer,
    mut reader: R,
    mut writer: W,
) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            debug!("Input closed");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<McpRequest>(trimmed) {
            Ok(request) => {
                debug!(method = %request.method, "Received request");
                server.handle_message(request).await
            }
            Err(e) => {
                warn!("Rejected malformed message: {}", e);
                Some(McpResponse::error(
                    RequestId::Null,
                    McpError::parse_error().with_data(serde_json::Value::String(e.to_string())),
                ))
            }
        };

        if let Some(response) = response {
            let encoded = serde_json::to_string(&response)?;
            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
}

/// Serve requests over the process's stdin and stdout.
pub async fn serve_stdio(server: &McpServer) -> Result<(), TransportError> {
    info!("Serving MCP over stdio");
    let reader = BufReader::new(tokio::io::stdin());
    serve(server, reader, tokio::io::stdout()).await
}
