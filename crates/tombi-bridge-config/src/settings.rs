//! Typed view of the editor's `tombi` settings section.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Name of the configuration section editors reserve for the bridge.
///
/// Also the settings scope sent to the server in
/// `workspace/didChangeConfiguration` relays.
pub const SETTINGS_SECTION: &str = "tombi";

/// The editor's `tombi` configuration section.
///
/// All fields are optional; [`Settings::default`] describes a user who
/// configured nothing. Unknown fields are ignored so older bridges keep
/// working against newer editor payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Language-server subsection.
    pub server: ServerSettings,
    /// HTTP proxy the engine should use for schema catalog fetches.
    ///
    /// Exported to the child process as `HTTPS_PROXY`.
    pub proxy: Option<Url>,
}

/// The `tombi.server` subsection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Explicit path to the `tombi` binary.
    ///
    /// Trusted verbatim by the resolver (after `~/` expansion); no
    /// existence check is performed on it.
    pub path: Option<Utf8PathBuf>,
    /// Extra arguments appended after the fixed language-service mode
    /// argument when spawning the server.
    pub args: Vec<String>,
}

impl Settings {
    /// Deserializes the settings section from an editor-provided JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Malformed`] when a present field has the
    /// wrong shape (absent fields fall back to defaults).
    pub fn from_json(value: serde_json::Value) -> Result<Self, SettingsError> {
        serde_json::from_value(value).map_err(|source| SettingsError::Malformed { source })
    }
}

/// Errors raised while decoding the settings section.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The editor payload did not match the expected shape.
    #[error("malformed tombi settings section: {source}")]
    Malformed {
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}
