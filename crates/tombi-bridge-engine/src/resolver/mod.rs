//! Multi-source discovery of the engine binary.
//!
//! Exactly one binary is resolved per activation, by trying an ordered
//! list of sources and stopping at the first success. The ordering is
//! part of the contract: an explicit editor setting always wins, the
//! bundled fallback is always last.

mod environment;
mod probes;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tombi_bridge_config::Settings;
use tracing::{debug, info};

pub use environment::{ResolverEnvironment, SystemEnvironment};

#[cfg(test)]
pub(crate) use environment::MockResolverEnvironment;

/// Log target for discovery operations.
pub(crate) const RESOLVER_TARGET: &str = "tombi_bridge::resolver";

/// Name of the engine binary, without platform suffix.
pub const LANGUAGE_SERVER_BIN_NAME: &str = "tombi";

/// Development-mode environment variable overriding the binary path.
pub const DEBUG_BINARY_ENV: &str = "__TOMBI_LANGUAGE_SERVER_DEBUG";

/// Binary subdirectory of Python virtual environments.
pub(crate) const VENV_BIN_DIR: &str = if cfg!(windows) { "Scripts" } else { "bin" };

/// Binary shim directory of local package-manager installations.
pub(crate) const LOCAL_PACKAGES_BIN_DIR: &str = "node_modules/.bin";

/// Engine binary filename with the platform suffix applied.
#[must_use]
pub fn platform_binary_name() -> &'static str {
    if cfg!(windows) { "tombi.exe" } else { "tombi" }
}

/// Where a resolved binary came from.
///
/// Variants are listed in priority order; [`BinarySource::ALL`]
/// preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySource {
    /// Explicit path in the editor's settings.
    EditorSettings,
    /// Development-mode environment override.
    DebugOverride,
    /// A Python virtual environment under a workspace root.
    WorkspaceVirtualEnv,
    /// A local package-manager installation under a workspace root.
    WorkspaceLocalPackages,
    /// The system `PATH`.
    SystemPath,
    /// The binary bundled with the extension itself.
    Bundled,
}

impl BinarySource {
    /// Every source, in the order the resolver consults them.
    pub const ALL: [Self; 6] = [
        Self::EditorSettings,
        Self::DebugOverride,
        Self::WorkspaceVirtualEnv,
        Self::WorkspaceLocalPackages,
        Self::SystemPath,
        Self::Bundled,
    ];

    /// Human-readable label used in status and command output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditorSettings => "editor settings",
            Self::DebugOverride => "debug override",
            Self::WorkspaceVirtualEnv => "workspace virtual environment",
            Self::WorkspaceLocalPackages => "workspace local packages",
            Self::SystemPath => "system PATH",
            Self::Bundled => "bundled",
        }
    }
}

impl fmt::Display for BinarySource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The executable chosen by the discovery chain, tagged with its source.
///
/// Immutable once produced; exactly one exists per active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    source: BinarySource,
    path: PathBuf,
}

impl ResolvedBinary {
    /// Builds a resolved binary.
    #[must_use]
    pub fn new(source: BinarySource, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    /// Which source produced the binary.
    #[must_use]
    pub fn source(&self) -> BinarySource {
        self.source
    }

    /// Path to the executable.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

/// Workspace facts the discovery probes evaluate against.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceContext {
    roots: Vec<PathBuf>,
    install_dir: Option<PathBuf>,
}

impl WorkspaceContext {
    /// Builds a context from the open workspace roots, in editor order.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            install_dir: None,
        }
    }

    /// Records the extension's own installation directory, enabling the
    /// bundled fallback.
    #[must_use]
    pub fn with_install_dir(mut self, install_dir: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(install_dir.into());
        self
    }

    /// Workspace roots, in order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The extension installation directory, when known.
    #[must_use]
    pub fn install_dir(&self) -> Option<&Path> {
        self.install_dir.as_deref()
    }
}

/// Errors raised when discovery fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No source yielded a binary. Fatal to activation.
    #[error(
        "the tombi language server was not found: checked editor settings, the debug \
         override, workspace environments, the system PATH, and the bundled location"
    )]
    NotFound,
}

/// Runs the discovery chain and returns the first successful source.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`] when every source comes up empty;
/// activation must not proceed in that case.
pub fn resolve_binary(
    settings: &Settings,
    workspace: &WorkspaceContext,
    environment: &dyn ResolverEnvironment,
) -> Result<ResolvedBinary, ResolveError> {
    for source in BinarySource::ALL {
        let candidate = match source {
            BinarySource::EditorSettings => probes::editor_settings(settings, environment),
            BinarySource::DebugOverride => probes::debug_override(environment),
            BinarySource::WorkspaceVirtualEnv => {
                probes::workspace_virtual_env(workspace, environment)
            }
            BinarySource::WorkspaceLocalPackages => {
                probes::workspace_local_packages(workspace, environment)
            }
            BinarySource::SystemPath => probes::system_path(environment),
            BinarySource::Bundled => probes::bundled(workspace, environment),
        };

        match candidate {
            Some(path) => {
                info!(
                    target: RESOLVER_TARGET,
                    source = %source,
                    path = %path.display(),
                    "using language server binary"
                );
                return Ok(ResolvedBinary::new(source, path));
            }
            None => {
                debug!(target: RESOLVER_TARGET, source = %source, "source yielded no binary");
            }
        }
    }

    Err(ResolveError::NotFound)
}
