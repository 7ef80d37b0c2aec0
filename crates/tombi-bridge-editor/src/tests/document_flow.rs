//! Document lifecycle routing behaviour.

use rstest::rstest;

use crate::document::EditorDocument;
use crate::documents::{
    announce_open_documents, document_opened, document_saved, settings_changed,
};
use crate::slot::SessionSlot;
use crate::tests::support::{CallLog, RecordedCall, RecordingEngineClient, ResponseSet};

fn recording_slot() -> (SessionSlot, CallLog) {
    let client = RecordingEngineClient::new(ResponseSet::default());
    let log = client.log();
    (SessionSlot::new(Box::new(client)), log)
}

#[rstest]
fn opened_toml_document_is_announced_with_full_state() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///a.toml", "toml", 3, "key = 1\n");

    document_opened(&slot, &document);

    assert_eq!(
        log.calls(),
        [RecordedCall::DidOpen {
            uri: String::from("file:///a.toml"),
            language_id: String::from("toml"),
            version: 3,
            text: String::from("key = 1\n"),
        }]
    );
}

#[rstest]
fn opened_lockfile_dialect_is_announced() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///Cargo.lock", "cargoLock", 1, "");

    document_opened(&slot, &document);

    assert_eq!(log.calls().len(), 1);
}

#[rstest]
#[case("json")]
#[case("markdown")]
fn opened_non_toml_document_is_ignored(#[case] language_id: &str) {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///a.json", language_id, 1, "{}");

    document_opened(&slot, &document);

    assert!(log.calls().is_empty());
}

#[rstest]
fn saved_config_file_triggers_update_config() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///workspace/tombi.toml", "toml", 1, "");

    document_saved(&slot, &document);

    assert_eq!(
        log.calls(),
        [RecordedCall::UpdateConfig {
            uri: String::from("file:///workspace/tombi.toml"),
        }]
    );
}

#[rstest]
fn config_filename_wins_over_json_language() {
    // Branch order matters: a document whose path ends with a config
    // filename updates the config even when its language id is JSON.
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///workspace/tombi.toml", "json", 1, "");

    document_saved(&slot, &document);

    assert_eq!(
        log.calls(),
        [RecordedCall::UpdateConfig {
            uri: String::from("file:///workspace/tombi.toml"),
        }]
    );
}

#[rstest]
fn saved_json_document_triggers_update_schema() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///schemas/config.schema.json", "json", 1, "{}");

    document_saved(&slot, &document);

    assert_eq!(
        log.calls(),
        [RecordedCall::UpdateSchema {
            uri: String::from("file:///schemas/config.schema.json"),
        }]
    );
}

#[rstest]
fn saved_ordinary_toml_triggers_nothing() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("file:///workspace/Cargo.toml", "toml", 1, "");

    document_saved(&slot, &document);

    assert!(log.calls().is_empty());
}

#[rstest]
fn activation_sweep_replays_only_toml_documents() {
    let (slot, log) = recording_slot();
    let documents = [
        EditorDocument::new("file:///a.toml", "toml", 1, ""),
        EditorDocument::new("file:///b.json", "json", 1, "{}"),
        EditorDocument::new("file:///Cargo.lock", "cargoLock", 1, ""),
    ];

    announce_open_documents(&slot, &documents);

    let calls = log.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| matches!(call, RecordedCall::DidOpen { .. })));
}

#[rstest]
fn settings_change_is_relayed() {
    let (slot, log) = recording_slot();

    settings_changed(&slot);

    assert_eq!(log.calls(), [RecordedCall::DidChangeConfiguration]);
}

#[rstest]
fn unparsable_uri_is_skipped() {
    let (slot, log) = recording_slot();
    let document = EditorDocument::new("not a uri", "toml", 1, "");

    document_opened(&slot, &document);

    assert!(log.calls().is_empty());
}
