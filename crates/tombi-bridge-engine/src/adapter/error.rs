//! Error types for the engine process adapter.

use std::io;

use thiserror::Error;

use super::jsonrpc::JsonRpcError;

/// Errors raised during engine process management.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The engine binary was not found when spawning.
    #[error("engine binary not found: {command}")]
    BinaryNotFound {
        /// The command that was not found.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to spawn the engine process.
    #[error("failed to spawn engine process: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Transport-level I/O error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialization/deserialization error.
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The engine returned an error response.
    #[error("engine returned error: {message} (code: {code})")]
    EngineError {
        /// The JSON-RPC error code.
        code: i64,
        /// The error message from the engine.
        message: String,
    },

    /// The initialization handshake failed.
    #[error("initialization failed: {message}")]
    InitializationFailed {
        /// Description of the handshake failure.
        message: String,
    },

    /// The engine process is not running.
    #[error("engine process exited unexpectedly")]
    ProcessExited,

    /// No matching response arrived within the bounded read loop.
    #[error("gave up waiting for response to request {request_id}")]
    MaxResponseIterations {
        /// The request ID the loop was waiting for.
        request_id: i64,
    },
}

impl AdapterError {
    /// Creates an engine error from a JSON-RPC error object.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::EngineError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing Content-Length header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// Invalid header format.
    #[error("invalid header format")]
    InvalidHeader,
}
