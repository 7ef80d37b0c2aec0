//! JSON-RPC 2.0 message types for engine communication.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thread-safe request ID generator.
static REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Generates a unique request ID.
///
/// IDs are monotonically increasing and thread-safe.
#[must_use]
pub fn next_request_id() -> i64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Unique request identifier.
    pub id: i64,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a new request with an auto-generated ID.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_request_id(),
            method: method.into(),
            params,
        }
    }

    /// Creates a new request with a specific ID.
    #[must_use]
    pub fn with_id(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a new notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response message.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    pub jsonrpc: String,
    /// Request identifier this response corresponds to.
    pub id: Option<i64>,
    /// The result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

/// A request initiated by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerRequest {
    /// Request identifier to echo in the reply.
    pub id: i64,
    /// The method the engine invokes.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A notification initiated by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerNotification {
    /// The method the engine invokes.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// Any message the engine can put on the wire.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// Response to one of our requests.
    Response(JsonRpcResponse),
    /// Engine-initiated request.
    ServerRequest(JsonRpcServerRequest),
    /// Engine-initiated notification.
    Notification(JsonRpcServerNotification),
}

impl JsonRpcMessage {
    /// Classifies and decodes a raw message payload.
    ///
    /// A payload carrying `method` is a server request when it also
    /// carries `id`, a notification otherwise; everything else is
    /// treated as a response.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error for malformed JSON.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.get("method").is_some() {
            if value.get("id").is_some() {
                return Ok(Self::ServerRequest(serde_json::from_value(value)?));
            }
            return Ok(Self::Notification(serde_json::from_value(value)?));
        }
        Ok(Self::Response(serde_json::from_value(value)?))
    }
}
