//! Wire envelopes for the line-delimited JSON-RPC transport.
//!
//! Every envelope travels as one `\n`-terminated line. A response carries
//! exactly one of `result` or `error`; the absent side is skipped during
//! serialization rather than sent as `null`, and both constructors stamp
//! the `"2.0"` protocol tag so no caller builds a half-filled envelope by
//! hand.

use serde::{Deserialize, Serialize};
use sqlscout_core::constants;

/// Request rejected before reaching a tool: no such method or tool.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Request reached a tool but a required argument was missing or not a string.
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    /// Build an outbound request. Ids are plain integers on this transport;
    /// the client hands out one per call and never reuses it.
    pub fn new(id: i64, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: constants::JSONRPC_VERSION.into(),
            id: Some(serde_json::Value::from(id)),
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: constants::JSONRPC_VERSION.into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: constants::JSONRPC_VERSION.into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}
