//! Status snapshot and its pure rendering.
//!
//! The indicator never holds protocol state of its own: each successful
//! query produces a [`StatusSnapshot`] that supersedes the previous one
//! wholesale, and rendering is a pure function of that snapshot plus
//! the session's version string.

use tombi_bridge_engine::{
    DocumentParams, EngineClient, EngineClientError, IgnoreReason, StatusDialect, StatusResponse,
    TomlVersionResponse, TomlVersionSource, status_dialect,
};

use crate::commands::COMMAND_SHOW_VERSION;

/// Indicator text rendered when the status query failed.
pub const STATUS_UNKNOWN_TEXT: &str = "TOML: <unknown>";

/// Glyph prefixed to the indicator text when the engine ignores the
/// document.
const WARNING_GLYPH: &str = "\u{26a0}";

/// The engine's current interpretation of the active document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Effective TOML version.
    pub toml_version: String,
    /// Where that version came from.
    pub source: TomlVersionSource,
    /// Configuration file backing the interpretation, when any.
    pub config_path: Option<String>,
    /// Set when the engine is ignoring the document.
    pub ignore: Option<IgnoreReason>,
}

impl StatusSnapshot {
    /// Queries the engine for the active document's status, using the
    /// dialect the cached version supports.
    ///
    /// The legacy dialect has no config-path or ignore fields; they
    /// surface as absent.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`EngineClientError`] verbatim so the
    /// raw message can be surfaced in the tooltip.
    pub fn query(
        client: &mut dyn EngineClient,
        cached_version: &str,
        uri: &str,
    ) -> Result<Self, EngineClientError> {
        match status_dialect(cached_version) {
            StatusDialect::Combined => client
                .get_status(DocumentParams::new(uri))
                .map(Self::from),
            StatusDialect::Legacy => client
                .get_toml_version(DocumentParams::new(uri))
                .map(Self::from),
        }
    }
}

impl From<StatusResponse> for StatusSnapshot {
    fn from(response: StatusResponse) -> Self {
        Self {
            toml_version: response.toml_version,
            source: response.source,
            config_path: response.config_path,
            ignore: response.ignore,
        }
    }
}

impl From<TomlVersionResponse> for StatusSnapshot {
    fn from(response: TomlVersionResponse) -> Self {
        Self {
            toml_version: response.toml_version,
            source: response.source,
            config_path: None,
            ignore: None,
        }
    }
}

/// Colour contract for the rendered indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    /// Default indicator colours.
    Normal,
    /// Distinguishable but non-error colours (document ignored).
    Warning,
    /// The theme's error foreground/background.
    Error,
}

/// Everything the editor needs to draw the indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRender {
    /// Indicator text.
    pub text: String,
    /// Tooltip body, one fact per line.
    pub tooltip: String,
    /// Colour contract.
    pub severity: StatusSeverity,
    /// Command to invoke when the indicator is clicked.
    pub command: &'static str,
}

/// Renders a successful snapshot.
#[must_use]
pub fn render_success(server_version: &str, snapshot: &StatusSnapshot) -> StatusRender {
    let heading = format!("TOML: {} ({})", snapshot.toml_version, snapshot.source);
    let config = snapshot.config_path.as_deref().unwrap_or("default");
    let mut tooltip = format!("Tombi: {server_version}\n{heading}\nConfig: {config}");

    match snapshot.ignore {
        Some(reason) => {
            tooltip.push_str("\nIgnore: ");
            tooltip.push_str(&humanize_reason(reason));
            StatusRender {
                text: format!("{WARNING_GLYPH} {heading}"),
                tooltip,
                severity: StatusSeverity::Warning,
                command: COMMAND_SHOW_VERSION,
            }
        }
        None => StatusRender {
            text: heading,
            tooltip,
            severity: StatusSeverity::Normal,
            command: COMMAND_SHOW_VERSION,
        },
    }
}

/// Renders the failure state with the raw error in the tooltip.
#[must_use]
pub fn render_failure(server_version: &str, error_message: &str) -> StatusRender {
    StatusRender {
        text: STATUS_UNKNOWN_TEXT.to_owned(),
        tooltip: format!("Tombi: {server_version}\nTOML: <unknown>\nError: {error_message}"),
        severity: StatusSeverity::Error,
        command: COMMAND_SHOW_VERSION,
    }
}

/// Wire ignore reason with separators replaced by spaces.
fn humanize_reason(reason: IgnoreReason) -> String {
    reason.to_string().replace(['-', '_'], " ")
}
