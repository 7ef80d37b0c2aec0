//! Long-lived engine session with a memoized version probe.

use std::path::Path;
use std::process::Command;
use std::string::FromUtf8Error;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

use crate::resolver::ResolvedBinary;

/// Log target for session operations.
const SESSION_TARGET: &str = "tombi_bridge::session";

/// Sentinel cached when the version probe fails.
///
/// Permanent for the session: a failed probe is never retried, and
/// version-gated decisions treat the sentinel as below every threshold.
pub const UNKNOWN_VERSION: &str = "<unknown>";

/// Name prefix the engine prints before its version number.
const VERSION_OUTPUT_PREFIX: &str = "tombi";

/// Errors raised while probing the engine binary for its version.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Spawning the probe process failed.
    #[error("failed to spawn version probe: {source}")]
    Spawn {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The probe process exited unsuccessfully.
    #[error("version probe exited with {status}")]
    Failed {
        /// Exit status of the probe process.
        status: std::process::ExitStatus,
    },
    /// The probe output was not valid UTF-8.
    #[error("version probe produced non-UTF-8 output: {source}")]
    Decode {
        /// Underlying decode error.
        #[source]
        source: FromUtf8Error,
    },
    /// The probe produced no usable output.
    #[error("version probe produced empty output")]
    Empty,
}

/// Obtains the version string advertised by an engine binary.
///
/// A trait so session tests can count invocations without spawning
/// processes.
pub trait VersionProbe: Send + Sync {
    /// Runs the probe against the supplied binary.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] when the probe cannot produce a version
    /// string.
    fn probe(&self, binary: &Path) -> Result<String, ProbeError>;
}

/// Default probe: spawns `<binary> --version` and reads stdout to
/// completion.
///
/// The child handle is reaped by [`Command::output`] on every path, so
/// a failed probe leaks no process.
#[derive(Debug, Default)]
pub struct CommandVersionProbe;

impl VersionProbe for CommandVersionProbe {
    fn probe(&self, binary: &Path) -> Result<String, ProbeError> {
        let output = Command::new(binary)
            .arg("--version")
            .output()
            .map_err(|source| ProbeError::Spawn { source })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status,
            });
        }

        String::from_utf8(output.stdout).map_err(|source| ProbeError::Decode { source })
    }
}

/// The long-lived association between one editor window and one engine.
///
/// Owns the resolved binary and memoizes the result of the version
/// probe for the session's lifetime.
pub struct EngineSession {
    binary: ResolvedBinary,
    probe: Box<dyn VersionProbe>,
    cached_version: Mutex<Option<String>>,
}

impl EngineSession {
    /// Builds a session around the resolved binary using the default
    /// command-line probe.
    #[must_use]
    pub fn new(binary: ResolvedBinary) -> Self {
        Self::with_probe(binary, Box::new(CommandVersionProbe))
    }

    /// Builds a session with a custom version probe.
    #[must_use]
    pub fn with_probe(binary: ResolvedBinary, probe: Box<dyn VersionProbe>) -> Self {
        Self {
            binary,
            probe,
            cached_version: Mutex::new(None),
        }
    }

    /// The binary this session was created for.
    #[must_use]
    pub fn binary(&self) -> &ResolvedBinary {
        &self.binary
    }

    /// Returns the engine's version string, probing on first call.
    ///
    /// The probe runs at most once per session, even under concurrent
    /// first calls: the cache lock is held across the probe. A failed
    /// probe caches [`UNKNOWN_VERSION`] permanently rather than raising.
    pub fn show_version(&self) -> String {
        let mut cached = self
            .cached_version
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if let Some(version) = cached.as_ref() {
            return version.clone();
        }

        let version = match self.probe.probe(self.binary.path()) {
            Ok(raw) => match normalize_version_output(&raw) {
                Some(version) => {
                    debug!(
                        target: SESSION_TARGET,
                        version = %version,
                        "engine version probed"
                    );
                    version
                }
                None => {
                    warn!(
                        target: SESSION_TARGET,
                        raw = %raw.trim(),
                        "version probe output carried no version"
                    );
                    UNKNOWN_VERSION.to_owned()
                }
            },
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    binary = %self.binary.path().display(),
                    error = %error,
                    "version probe failed"
                );
                UNKNOWN_VERSION.to_owned()
            }
        };

        *cached = Some(version.clone());
        version
    }
}

impl std::fmt::Debug for EngineSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = match self.cached_version.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        formatter
            .debug_struct("EngineSession")
            .field("binary", &self.binary)
            .field("cached_version", &cached)
            .finish()
    }
}

/// Strips the engine's name prefix and surrounding whitespace from
/// probe output.
///
/// `"tombi 0.5.1\n"` and `"0.5.1"` both normalize to `"0.5.1"`; output
/// with nothing left after stripping yields `None`.
fn normalize_version_output(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let version = trimmed
        .strip_prefix(VERSION_OUTPUT_PREFIX)
        .map_or(trimmed, str::trim_start);
    if version.is_empty() {
        None
    } else {
        Some(version.to_owned())
    }
}
