//! Internal state of the engine process.

use std::process::Child;

use super::transport::StdioTransport;

/// Lifecycle state of the spawned engine.
pub enum ProcessState {
    /// Process has not been started.
    NotStarted,
    /// Process is running and ready for communication.
    Running {
        /// The child process handle.
        child: Child,
        /// The transport for JSON-RPC communication.
        transport: StdioTransport,
    },
    /// Process has been stopped.
    Stopped,
}
