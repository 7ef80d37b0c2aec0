//! Launch configuration for the engine process.

use std::path::PathBuf;

use tombi_bridge_config::Settings;
use url::Url;

use crate::resolver::ResolvedBinary;

/// Fixed first argument selecting the engine's language-service mode.
pub const SERVE_MODE_ARG: &str = "lsp";

/// Everything needed to spawn the engine as a language server.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// The resolved executable.
    pub binary: PathBuf,
    /// User-configured arguments appended after [`SERVE_MODE_ARG`].
    pub args: Vec<String>,
    /// Proxy exported to the child as `HTTPS_PROXY`.
    pub proxy: Option<Url>,
    /// Working directory for the spawned process.
    pub working_dir: Option<PathBuf>,
}

impl LaunchConfig {
    /// Builds a bare configuration for the supplied executable.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            proxy: None,
            working_dir: None,
        }
    }

    /// Derives the launch configuration from a resolved binary and the
    /// editor's settings.
    #[must_use]
    pub fn from_settings(binary: &ResolvedBinary, settings: &Settings) -> Self {
        Self {
            binary: binary.path().to_path_buf(),
            args: settings.server.args.clone(),
            proxy: settings.proxy.clone(),
            working_dir: None,
        }
    }

    /// Sets a custom working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tombi_bridge_config::Settings;

    use super::*;
    use crate::resolver::{BinarySource, ResolvedBinary};

    #[rstest]
    fn carries_settings_args_and_proxy() {
        let mut settings = Settings::default();
        settings.server.args = vec![String::from("--offline")];
        settings.proxy = Some(Url::parse("http://proxy.internal:3128/").expect("valid url"));
        let binary = ResolvedBinary::new(BinarySource::SystemPath, "/usr/bin/tombi");

        let config = LaunchConfig::from_settings(&binary, &settings);

        assert_eq!(config.binary, PathBuf::from("/usr/bin/tombi"));
        assert_eq!(config.args, vec!["--offline"]);
        assert!(config.proxy.is_some());
        assert!(config.working_dir.is_none());
    }

    #[rstest]
    fn builder_sets_working_dir() {
        let config = LaunchConfig::new("/usr/bin/tombi").with_working_dir("/workspace");

        assert_eq!(config.working_dir, Some(PathBuf::from("/workspace")));
    }
}
