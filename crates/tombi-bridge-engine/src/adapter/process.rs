//! Process-backed engine client.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use lsp_types::{ClientCapabilities, InitializeParams, InitializeResult, InitializedParams};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::ADAPTER_TARGET;
use super::config::{LaunchConfig, SERVE_MODE_ARG};
use super::error::AdapterError;
use super::jsonrpc::{JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use super::lifecycle::terminate_child;
use super::state::ProcessState;
use super::transport::StdioTransport;

/// Maximum number of interleaved messages to skip while waiting for a
/// matching response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// Environment variable suppressing ANSI colour in the child's output.
const NO_COLOR_ENV: &str = "NO_COLOR";

/// Environment variable carrying the configured proxy to the child.
const PROXY_ENV: &str = "HTTPS_PROXY";

/// An engine client that spawns and communicates with the real engine
/// process.
///
/// Spawns `<binary> lsp <extra args>` with the host environment plus
/// colour suppression and the configured proxy, then speaks JSON-RPC
/// 2.0 with header framing over the child's stdio.
pub struct ProcessEngineClient {
    config: LaunchConfig,
    state: Mutex<ProcessState>,
}

impl ProcessEngineClient {
    /// Creates a client for the supplied launch configuration.
    ///
    /// Nothing is spawned until [`ProcessEngineClient::launch`].
    #[must_use]
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ProcessState::NotStarted),
        }
    }

    /// Spawns the engine and runs the initialization handshake.
    ///
    /// # Errors
    ///
    /// Returns an [`AdapterError`] when the process cannot be spawned
    /// or the handshake fails.
    pub fn launch(&self) -> Result<(), AdapterError> {
        let (child, transport) = self.spawn_process()?;
        self.set_running_state(child, transport);

        let params = InitializeParams {
            process_id: Some(std::process::id()),
            capabilities: ClientCapabilities::default(),
            ..InitializeParams::default()
        };
        let result: InitializeResult = self.send_request("initialize", params)?;
        self.send_notification("initialized", InitializedParams {})?;

        if let Some(info) = result.server_info {
            debug!(
                target: ADAPTER_TARGET,
                name = %info.name,
                version = ?info.version,
                "engine initialized"
            );
        }

        Ok(())
    }

    /// Spawns the engine process with the configured command line and
    /// environment.
    fn spawn_process(&self) -> Result<(Child, StdioTransport), AdapterError> {
        debug!(
            target: ADAPTER_TARGET,
            command = %self.config.binary.display(),
            args = ?self.config.args,
            "spawning engine process"
        );

        let mut command = Command::new(&self.config.binary);
        command
            .arg(SERVE_MODE_ARG)
            .args(&self.config.args)
            .env(NO_COLOR_ENV, "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        if let Some(proxy) = &self.config.proxy {
            command.env(PROXY_ENV, proxy.as_str());
        }
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AdapterError::BinaryNotFound {
                    command: self.config.binary.display().to_string(),
                    source: e,
                }
            } else {
                AdapterError::SpawnFailed {
                    message: format!("failed to start {}", self.config.binary.display()),
                    source: e,
                }
            }
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AdapterError::SpawnFailed {
                message: "failed to capture stdin".to_owned(),
                source: std::io::Error::other("no stdin"),
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AdapterError::SpawnFailed {
                message: "failed to capture stdout".to_owned(),
                source: std::io::Error::other("no stdout"),
            })?;

        let transport = StdioTransport::new(stdout, stdin);

        debug!(
            target: ADAPTER_TARGET,
            pid = child.id(),
            "engine process spawned"
        );

        Ok((child, transport))
    }

    /// Accesses the running transport with the state lock held.
    fn with_running_transport<F, T>(&self, f: F) -> Result<T, AdapterError>
    where
        F: FnOnce(&mut StdioTransport) -> Result<T, AdapterError>,
    {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        // Recover from poisoning so shutdown still works after a panic

        let transport = match &mut *state {
            ProcessState::Running { transport, .. } => transport,
            ProcessState::NotStarted | ProcessState::Stopped => {
                return Err(AdapterError::ProcessExited);
            }
        };

        f(transport)
    }

    /// Sends a request and receives the raw JSON-RPC response.
    fn send_request_raw<P>(&self, method: &str, params: P) -> Result<JsonRpcResponse, AdapterError>
    where
        P: Serialize,
    {
        self.with_running_transport(|transport| {
            let params_value = serde_json::to_value(params)?;
            let request = JsonRpcRequest::new(method, Some(params_value));
            let request_id = request.id;
            let payload = serde_json::to_vec(&request)?;

            debug!(target: ADAPTER_TARGET, method, id = request_id, "sending request");

            transport.send(&payload)?;
            let response = Self::receive_response_for_request(transport, request_id)?;

            if let Some(error) = response.error {
                return Err(AdapterError::from_jsonrpc(error));
            }

            Ok(response)
        })
    }

    /// Sends a request and decodes its result.
    pub(super) fn send_request<P, R>(&self, method: &str, params: P) -> Result<R, AdapterError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request_raw(method, params)?;
        let result = response
            .result
            .ok_or_else(|| AdapterError::InitializationFailed {
                message: "empty result in response".to_owned(),
            })?;
        serde_json::from_value(result).map_err(AdapterError::from)
    }

    /// Sends a notification (no response expected).
    pub(super) fn send_notification<P>(&self, method: &str, params: P) -> Result<(), AdapterError>
    where
        P: Serialize,
    {
        self.with_running_transport(|transport| {
            let params_value = serde_json::to_value(params)?;
            let notification = JsonRpcNotification::new(method, Some(params_value));
            let payload = serde_json::to_vec(&notification)?;

            debug!(target: ADAPTER_TARGET, method, "sending notification");

            transport.send(&payload)?;
            Ok(())
        })
    }

    /// Receives messages until a response with the expected ID arrives.
    ///
    /// Interleaved notifications and engine-initiated requests are
    /// skipped; the loop is bounded so a flood of unrelated messages
    /// cannot block forever.
    fn receive_response_for_request(
        transport: &mut StdioTransport,
        request_id: i64,
    ) -> Result<JsonRpcResponse, AdapterError> {
        for _ in 0..MAX_RESPONSE_ITERATIONS {
            let message_bytes = transport.receive()?;

            match JsonRpcMessage::from_bytes(&message_bytes)? {
                JsonRpcMessage::Response(response) => {
                    if response.id == Some(request_id) {
                        return Ok(response);
                    }
                    warn!(
                        target: ADAPTER_TARGET,
                        expected = request_id,
                        received = ?response.id,
                        "skipping response with non-matching ID"
                    );
                }
                JsonRpcMessage::ServerRequest(request) => {
                    warn!(
                        target: ADAPTER_TARGET,
                        method = %request.method,
                        id = request.id,
                        "ignoring engine-initiated request"
                    );
                }
                JsonRpcMessage::Notification(notification) => {
                    debug!(
                        target: ADAPTER_TARGET,
                        method = %notification.method,
                        "skipping engine notification"
                    );
                }
            }
        }

        warn!(
            target: ADAPTER_TARGET,
            request_id,
            max_iterations = MAX_RESPONSE_ITERATIONS,
            "giving up on response after reaching maximum iterations"
        );
        Err(AdapterError::MaxResponseIterations { request_id })
    }

    /// Performs graceful shutdown of the engine.
    ///
    /// Sends a `shutdown` request followed by an `exit` notification,
    /// then waits for the process to terminate, killing it after a
    /// grace period.
    pub fn shutdown_process(&self) {
        debug!(target: ADAPTER_TARGET, "initiating graceful shutdown");

        if let Err(error) = self.send_request::<_, Value>("shutdown", ()) {
            debug!(target: ADAPTER_TARGET, error = ?error, "shutdown request failed");
        }
        if let Err(error) = self.send_notification("exit", ()) {
            debug!(target: ADAPTER_TARGET, error = ?error, "exit notification failed");
        }

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut *state, ProcessState::Stopped)
        {
            terminate_child(&mut child);
        }
    }

    /// Installs the running state after a successful spawn.
    fn set_running_state(&self, child: Child, transport: StdioTransport) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        *state = ProcessState::Running { child, transport };
    }
}

impl Drop for ProcessEngineClient {
    fn drop(&mut self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut *state, ProcessState::Stopped)
        {
            if let Err(error) = child.kill() {
                warn!(
                    target: ADAPTER_TARGET,
                    error = %error,
                    "failed to kill engine process on drop"
                );
            } else {
                let _ = child.wait();
            }
        }
    }
}

impl std::fmt::Debug for ProcessEngineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state_desc = match self.state.lock() {
            Ok(guard) => match &*guard {
                ProcessState::NotStarted => "not_started",
                ProcessState::Running { child, .. } => {
                    return f
                        .debug_struct("ProcessEngineClient")
                        .field("binary", &self.config.binary)
                        .field("state", &format!("running (pid: {})", child.id()))
                        .finish();
                }
                ProcessState::Stopped => "stopped",
            },
            Err(_) => "poisoned",
        };

        f.debug_struct("ProcessEngineClient")
            .field("binary", &self.config.binary)
            .field("state", &state_desc)
            .finish()
    }
}
