//! Routes document lifecycle events to protocol operations.

use lsp_types::DidChangeConfigurationParams;
use serde_json::Value;
use tombi_bridge_config::SETTINGS_SECTION;
use tombi_bridge_engine::DocumentParams;
use tracing::{debug, warn};

use crate::document::{DOCUMENT_TARGET, EditorDocument};
use crate::slot::SessionSlot;

/// Handles a newly opened document.
///
/// TOML-family documents are announced to the engine with their full
/// text; everything else is ignored.
pub fn document_opened(slot: &SessionSlot, document: &EditorDocument) {
    if !document.is_toml_family() {
        return;
    }
    let Some(params) = document.to_open_params() else {
        return;
    };

    debug!(target: DOCUMENT_TARGET, uri = %document.uri, "announcing opened document");
    if let Err(error) = slot.with_client(|client| client.did_open(params)) {
        warn!(
            target: DOCUMENT_TARGET,
            uri = %document.uri,
            error = %error,
            "didOpen notification failed"
        );
    }
}

/// Handles a saved document.
///
/// A recognized configuration filename triggers `tombi/updateConfig`;
/// otherwise a JSON document triggers `tombi/updateSchema`. The two
/// branches are mutually exclusive, evaluated in that order, so a
/// configuration file wins even when its language id is JSON.
pub fn document_saved(slot: &SessionSlot, document: &EditorDocument) {
    if document.is_config_file() {
        debug!(target: DOCUMENT_TARGET, uri = %document.uri, "configuration file saved");
        let result =
            slot.with_client(|client| client.update_config(DocumentParams::new(&document.uri)));
        if let Err(error) = result {
            warn!(
                target: DOCUMENT_TARGET,
                uri = %document.uri,
                error = %error,
                "updateConfig request failed"
            );
        }
    } else if document.is_json() {
        debug!(target: DOCUMENT_TARGET, uri = %document.uri, "schema document saved");
        let result =
            slot.with_client(|client| client.update_schema(DocumentParams::new(&document.uri)));
        if let Err(error) = result {
            warn!(
                target: DOCUMENT_TARGET,
                uri = %document.uri,
                error = %error,
                "updateSchema request failed"
            );
        }
    }
}

/// Replays `didOpen` for documents that were already open at activation.
///
/// The engine only learns about documents opened after it started;
/// without the sweep a TOML file sitting in a background tab would stay
/// invisible to it.
pub fn announce_open_documents(slot: &SessionSlot, documents: &[EditorDocument]) {
    for document in documents {
        document_opened(slot, document);
    }
}

/// Relays an editor settings change to the engine.
pub fn settings_changed(slot: &SessionSlot) {
    let params = DidChangeConfigurationParams {
        settings: Value::String(SETTINGS_SECTION.to_owned()),
    };
    if let Err(error) = slot.with_client(|client| client.did_change_configuration(params)) {
        warn!(
            target: DOCUMENT_TARGET,
            error = %error,
            "didChangeConfiguration notification failed"
        );
    }
}
