//! Process-backed adapter for the engine.
//!
//! Spawns the resolved `tombi` binary in language-service mode and
//! speaks JSON-RPC 2.0 with header framing over its stdio. The
//! [`ProcessEngineClient`] struct implements the
//! [`EngineClient`](crate::EngineClient) trait, so the editor layer
//! never sees the process machinery.
//!
//! The adapter is organized into:
//!
//! - [`LaunchConfig`]: command line and environment for the spawn
//! - [`AdapterError`] and [`TransportError`]: adapter error taxonomy
//! - [`JsonRpcRequest`], [`JsonRpcResponse`]: JSON-RPC 2.0 messages
//! - [`FramedTransport`]: `Content-Length`-framed transport
//! - [`ProcessEngineClient`]: the adapter itself

mod config;
mod error;
mod jsonrpc;
mod lifecycle;
mod process;
mod state;
mod trait_impl;
mod transport;

/// Log target for adapter operations.
pub(crate) const ADAPTER_TARGET: &str = "tombi_bridge::adapter";

pub use config::{LaunchConfig, SERVE_MODE_ARG};
pub use error::{AdapterError, TransportError};
pub use jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    JsonRpcServerNotification, JsonRpcServerRequest,
};
pub use process::ProcessEngineClient;
pub use state::ProcessState;
pub use transport::{FramedTransport, StdioTransport};
