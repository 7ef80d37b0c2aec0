//! User-invocable commands.
//!
//! Each command translates to one or more protocol calls and reports
//! back through [`UserFeedback`]; no command failure escapes as an
//! error.

use tombi_bridge_engine::{
    AssociateSchemaParams, BinarySource, EngineSession, SchemaInfo, WireCapability,
};
use tracing::info;

use crate::document::EditorDocument;
use crate::slot::{EngineClientFactory, SessionSlot};

/// Log target for command handling.
const COMMAND_TARGET: &str = "tombi_bridge::commands";

/// Command id: present the engine's version and resolution source.
pub const COMMAND_SHOW_VERSION: &str = "tombi.showLanguageServerVersion";
/// Command id: stop and relaunch the engine session.
pub const COMMAND_RESTART: &str = "tombi.restartLanguageServer";
/// Command id: drop and rebuild the engine's schema cache.
pub const COMMAND_REFRESH_CACHE: &str = "tombi.refreshCache";
/// Command id: associate a schema with the active document.
pub const COMMAND_SELECT_SCHEMA: &str = "tombi.selectSchema";

/// Transient notifications shown to the user.
pub trait UserFeedback {
    /// Informational toast.
    fn info(&self, message: &str);
    /// Warning toast.
    fn warning(&self, message: &str);
    /// Error toast.
    fn error(&self, message: &str);
}

/// One row of the schema picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPickItem {
    /// Primary label: the schema title, falling back to its URI.
    pub label: String,
    /// Secondary text: the schema URI.
    pub description: String,
    /// Optional detail line: the schema description.
    pub detail: Option<String>,
}

impl SchemaPickItem {
    fn from_schema(schema: &SchemaInfo) -> Self {
        Self {
            label: schema
                .title
                .clone()
                .unwrap_or_else(|| schema.uri.clone()),
            description: schema.uri.clone(),
            detail: schema.description.clone(),
        }
    }
}

/// Searchable picker over schema title/uri/description.
///
/// Returns the index of the chosen item, or `None` when the user
/// cancels.
pub trait SchemaPicker {
    /// Presents the items and waits for a choice.
    fn pick(&self, items: &[SchemaPickItem]) -> Option<usize>;
}

/// Presents the cached engine version and where the binary came from.
///
/// Non-bundled sources include the literal path so users can tell which
/// installation answered.
pub fn show_version(session: &EngineSession, feedback: &dyn UserFeedback) {
    let version = session.show_version();
    let binary = session.binary();
    let message = match binary.source() {
        BinarySource::Bundled => {
            format!("Tombi Language Server {version} (bundled)")
        }
        source => format!(
            "Tombi Language Server {version} ({source}: {})",
            binary.path().display()
        ),
    };
    feedback.info(&message);
}

/// Stops and relaunches the engine session.
pub fn restart(slot: &SessionSlot, factory: &dyn EngineClientFactory, feedback: &dyn UserFeedback) {
    match slot.restart(factory) {
        Ok(()) => {
            info!(target: COMMAND_TARGET, "language server restarted");
            feedback.info("Tombi Language Server restarted");
        }
        Err(error) => {
            feedback.error(&format!("Failed to restart Tombi Language Server: {error}"));
        }
    }
}

/// Asks the engine to drop and rebuild its schema cache.
pub fn refresh_cache(slot: &SessionSlot, feedback: &dyn UserFeedback) {
    match slot.with_client(|client| client.refresh_cache()) {
        Ok(_) => feedback.info("Tombi schema cache refreshed"),
        Err(error) => feedback.error(&format!("Failed to refresh schema cache: {error}")),
    }
}

/// Lets the user bind a schema to the active document.
///
/// Gated on the engine version; requires an active TOML-family document
/// backed by a saved file. The association is scoped to the exact file
/// path and forced ahead of catalog-derived associations.
pub fn select_schema(
    session: &EngineSession,
    slot: &SessionSlot,
    document: Option<&EditorDocument>,
    picker: &dyn SchemaPicker,
    feedback: &dyn UserFeedback,
) {
    let version = session.show_version();
    if !WireCapability::SchemaSelection.supported_by(&version) {
        feedback.warning(&format!(
            "Schema selection requires Tombi {} or newer (running {version})",
            WireCapability::SchemaSelection.minimum()
        ));
        return;
    }

    let Some(document) = document else {
        feedback.warning("No active editor");
        return;
    };
    if !document.is_toml_family() {
        feedback.warning("Current file is not a TOML file. Please open a TOML file first.");
        return;
    }
    let Some(file_path) = document.file_path() else {
        feedback.warning("Please save the file before selecting a schema.");
        return;
    };

    let schemas = match slot.with_client(|client| client.list_schemas()) {
        Ok(response) => response.schemas,
        Err(error) => {
            feedback.error(&format!("Failed to select schema: {error}"));
            return;
        }
    };
    if schemas.is_empty() {
        feedback.info("No schemas available");
        return;
    }

    let items: Vec<SchemaPickItem> = schemas.iter().map(SchemaPickItem::from_schema).collect();
    let Some(index) = picker.pick(&items) else {
        // User cancelled; not an error.
        return;
    };
    let Some(schema) = schemas.get(index) else {
        return;
    };
    let label = items
        .get(index)
        .map_or_else(|| schema.uri.clone(), |item| item.label.clone());

    let params = AssociateSchemaParams {
        title: schema.title.clone(),
        description: schema.description.clone(),
        uri: schema.uri.clone(),
        file_match: vec![file_path],
        toml_version: schema.toml_version.clone(),
        force: Some(true),
    };

    match slot.with_client(|client| client.associate_schema(params)) {
        Ok(()) => {
            info!(
                target: COMMAND_TARGET,
                schema = %schema.uri,
                "schema associated"
            );
            feedback.info(&format!("Schema \"{label}\" applied successfully"));
        }
        Err(error) => feedback.error(&format!("Failed to select schema: {error}")),
    }
}
