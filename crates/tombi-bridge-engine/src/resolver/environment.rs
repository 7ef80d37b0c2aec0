//! Environment abstraction behind the discovery probes.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::RESOLVER_TARGET;

/// Host facilities the discovery probes depend on.
///
/// Kept behind a trait so every probe is testable without touching the
/// real environment. All operations are read-only; [`locate_on_path`]
/// is the only one that spawns a child process.
///
/// [`locate_on_path`]: ResolverEnvironment::locate_on_path
#[cfg_attr(test, mockall::automock)]
pub trait ResolverEnvironment {
    /// Reads an environment variable, `None` when unset or not UTF-8.
    fn env_var(&self, name: &str) -> Option<String>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Path of the Python interpreter active for the supplied workspace
    /// root, when an interpreter environment is detected.
    fn python_interpreter(&self, workspace_root: &Path) -> Option<PathBuf>;

    /// Whether a regular file exists at the supplied path.
    fn file_exists(&self, path: &Path) -> bool;

    /// Locates a binary on the system `PATH`.
    ///
    /// Absence is the only failure mode: spawn errors, non-zero exits
    /// and empty output all yield `None`, never an error.
    fn locate_on_path(&self, binary: &str) -> Option<PathBuf>;
}

/// [`ResolverEnvironment`] backed by the real process environment.
#[derive(Debug, Default)]
pub struct SystemEnvironment;

impl ResolverEnvironment for SystemEnvironment {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn python_interpreter(&self, _workspace_root: &Path) -> Option<PathBuf> {
        // An activated virtual environment applies to every root.
        let venv = PathBuf::from(self.env_var("VIRTUAL_ENV")?);
        let interpreter = venv
            .join(super::VENV_BIN_DIR)
            .join(python_binary_name());
        self.file_exists(&interpreter).then_some(interpreter)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn locate_on_path(&self, binary: &str) -> Option<PathBuf> {
        let locator = if cfg!(windows) { "where" } else { "which" };
        let output = match Command::new(locator).arg(binary).output() {
            Ok(output) => output,
            Err(error) => {
                debug!(
                    target: RESOLVER_TARGET,
                    locator,
                    error = %error,
                    "PATH lookup could not run"
                );
                return None;
            }
        };

        if !output.status.success() {
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
    }
}

fn python_binary_name() -> &'static str {
    if cfg!(windows) { "python.exe" } else { "python" }
}
