//! Process Host: a synchronous line-loop over stdin/stdout.
//!
//! The host alternates between waiting for one request line and producing
//! at most one response line. A request that fails to decode is logged and
//! dropped without a response; only end of input (or a dead stdout) ends
//! the loop. Startup is the single fail-fast path: the database connection
//! is opened and verified before the first line is read.

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND};
use crate::tools;
use serde_json::json;
use sqlscout_backend::SqlToolbox;
use sqlscout_core::config::Config;
use sqlscout_core::constants;
use sqlscout_core::error::McpError;
use std::io::{self, BufRead, Write};
use tracing::{error, info};

use self::tool_calls::handle_tool_call;

/// Run the MCP server loop on stdin/stdout.
pub fn run_server(config: &Config) -> Result<(), McpError> {
    let mut toolbox = SqlToolbox::open(&config.database.path, config.database.busy_timeout_ms)?;
    info!(database = %config.database.path, "MCP SQL server started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    serve(stdin.lock(), &mut stdout, &mut toolbox)
}

/// The host loop proper, generic over streams so tests can drive it.
pub fn serve(
    reader: impl BufRead,
    writer: &mut impl Write,
    toolbox: &mut SqlToolbox,
) -> Result<(), McpError> {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                // Malformed input produces no response line; the host just
                // goes back to waiting for the next request.
                error!("request decode failed: {}", e);
                continue;
            }
        };

        let response = handle_request(&request, toolbox);
        write_response(writer, &response)?;
    }

    info!("input stream closed, shutting down");
    Ok(())
}

fn handle_request(request: &JsonRpcRequest, toolbox: &mut SqlToolbox) -> JsonRpcResponse {
    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            request.id.clone(),
            json!({
                "protocolVersion": constants::PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": constants::SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "notifications/initialized" => JsonRpcResponse::success(request.id.clone(), json!({})),
        "tools/list" => {
            let tools = tools::list_tools();
            JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools }))
        }
        "tools/call" => {
            let tool_name = request
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(json!({}));

            handle_tool_call(request.id.clone(), tool_name, &arguments, toolbox)
        }
        _ => JsonRpcResponse::error(
            request.id.clone(),
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

/// Write one newline-terminated response line and flush it.
fn write_response(writer: &mut impl Write, response: &JsonRpcResponse) -> Result<(), McpError> {
    let serialized =
        serde_json::to_string(response).map_err(|e| McpError::Encode(e.to_string()))?;
    writeln!(writer, "{}", serialized)?;
    writer.flush()?;
    Ok(())
}

mod tool_calls;

#[cfg(test)]
mod tests;
