//! The serving loop: line-framed JSON-RPC over a byte stream.
//!
//! One request per line, answered in receipt order with one response line.
//! The loop is strictly serial; a request runs to completion before the
//! next line is read, so every observer sees a consistent document.
//!
//! Fault policy: a line that is not valid JSON-RPC gets an error envelope
//! with a null id and the server keeps going; an I/O failure on either
//! stream is fatal; EOF is a clean shutdown.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use score_state::Piece;

use crate::api;
use crate::jsonrpc::{ErrorData, JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse};

/// Serve until EOF on `input`. Generic over the streams so tests can
/// drive the loop with in-memory buffers.
pub fn serve(piece: &mut Piece, input: impl BufRead, mut output: impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle_line(piece, &line);
        output
            .write_all(reply.as_bytes())
            .and_then(|_| output.write_all(b"\n"))
            .and_then(|_| output.flush())
            .context("failed to write response")?;
    }

    info!("input closed, shutting down");
    Ok(())
}

/// Serve on stdin/stdout.
pub fn serve_stdio(piece: &mut Piece) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(piece, stdin.lock(), stdout.lock())
}

fn handle_line(piece: &mut Piece, line: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            debug!(%err, "unparseable request line");
            let response =
                JsonRpcErrorResponse::new(None, ErrorData::parse_error(err.to_string()));
            return encode(&response);
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => {
            debug!(%err, "request envelope rejected");
            let response = JsonRpcErrorResponse::new(
                None,
                ErrorData::new(ErrorData::INVALID_REQUEST, err.to_string()),
            );
            return encode(&response);
        }
    };

    let id = request.id.clone();
    match api::dispatch(piece, &request.method, request.params) {
        Ok(result) => encode(&JsonRpcResponse::success(id, result)),
        Err(error) => encode(&JsonRpcErrorResponse::new(Some(id), error)),
    }
}

fn encode<T: serde::Serialize>(response: &T) -> String {
    // Envelope types serialize infallibly; fall back to a canned internal
    // error rather than dying mid-protocol.
    serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"response serialization failed"}}"#
            .to_string()
    })
}
