//! The individual discovery probes, one per [`BinarySource`].
//!
//! Each probe is independent, returns an optional path, and performs at
//! most read-only checks; the resolver combines them with first-success
//! semantics.
//!
//! [`BinarySource`]: super::BinarySource

use std::path::PathBuf;

use camino::Utf8Path;
use tombi_bridge_config::Settings;

use super::environment::ResolverEnvironment;
use super::{
    DEBUG_BINARY_ENV, LOCAL_PACKAGES_BIN_DIR, RESOLVER_TARGET, VENV_BIN_DIR, WorkspaceContext,
    platform_binary_name,
};
use tracing::debug;

/// Explicit path from the editor's settings, `~/` expanded.
///
/// Trusted verbatim: no existence check, per the user's explicit
/// instruction.
pub(super) fn editor_settings(
    settings: &Settings,
    environment: &dyn ResolverEnvironment,
) -> Option<PathBuf> {
    settings
        .server
        .path
        .as_deref()
        .map(|path| expand_home(path, environment))
}

/// Development-mode override from the environment, verbatim.
pub(super) fn debug_override(environment: &dyn ResolverEnvironment) -> Option<PathBuf> {
    environment.env_var(DEBUG_BINARY_ENV).map(PathBuf::from)
}

/// Python virtual environments across the workspace roots, in order.
///
/// With a detected interpreter the engine is expected as a sibling in
/// the interpreter's own binary directory; without one, the
/// conventional `.venv` binary subdirectory of the root is probed
/// instead. The per-root loop stops on the first existing match.
pub(super) fn workspace_virtual_env(
    workspace: &WorkspaceContext,
    environment: &dyn ResolverEnvironment,
) -> Option<PathBuf> {
    for root in workspace.roots() {
        let candidate = match environment.python_interpreter(root) {
            Some(interpreter) => match interpreter.parent() {
                Some(bin_dir) => bin_dir.join(platform_binary_name()),
                None => continue,
            },
            None => root
                .join(".venv")
                .join(VENV_BIN_DIR)
                .join(platform_binary_name()),
        };

        if environment.file_exists(&candidate) {
            return Some(candidate);
        }
        debug!(
            target: RESOLVER_TARGET,
            candidate = %candidate.display(),
            "no virtual-env binary at candidate"
        );
    }
    None
}

/// Local package-manager binary directories across the workspace roots.
pub(super) fn workspace_local_packages(
    workspace: &WorkspaceContext,
    environment: &dyn ResolverEnvironment,
) -> Option<PathBuf> {
    workspace
        .roots()
        .iter()
        .map(|root| root.join(LOCAL_PACKAGES_BIN_DIR).join(platform_binary_name()))
        .find(|candidate| environment.file_exists(candidate))
}

/// `which`/`where` lookup on the system `PATH`.
pub(super) fn system_path(environment: &dyn ResolverEnvironment) -> Option<PathBuf> {
    environment.locate_on_path(super::LANGUAGE_SERVER_BIN_NAME)
}

/// Binary shipped inside the extension's own installation directory.
pub(super) fn bundled(
    workspace: &WorkspaceContext,
    environment: &dyn ResolverEnvironment,
) -> Option<PathBuf> {
    let candidate = workspace
        .install_dir()?
        .join("server")
        .join(platform_binary_name());
    environment.file_exists(&candidate).then_some(candidate)
}

/// Expands a leading `~/` to the platform home directory.
///
/// Left untouched when no home directory can be determined.
fn expand_home(path: &Utf8Path, environment: &dyn ResolverEnvironment) -> PathBuf {
    match path.as_str().strip_prefix("~/") {
        Some(rest) => environment
            .home_dir()
            .map_or_else(|| path.as_std_path().to_path_buf(), |home| home.join(rest)),
        None => path.as_std_path().to_path_buf(),
    }
}
