//! Command dispatch behaviour.

use rstest::rstest;
use tombi_bridge_engine::{
    BinarySource, EngineSession, ResolvedBinary, SchemaInfo,
};

use crate::bridge::{ActivationError, EditorBridge};
use crate::commands::{refresh_cache, restart, select_schema, show_version};
use crate::document::EditorDocument;
use crate::slot::{EngineClientFactory, SessionSlot};
use crate::tests::support::{
    CallLog, FeedbackLevel, FixedPicker, FixedVersionProbe, RecordedCall, RecordingClientFactory,
    RecordingEngineClient, RecordingFeedback, RecordingObserver, ResponseSet, ObservedStatus,
    session_with_failing_probe, session_with_version,
};

fn recording_slot(responses: ResponseSet) -> (SessionSlot, CallLog) {
    let client = RecordingEngineClient::new(responses);
    let log = client.log();
    (SessionSlot::new(Box::new(client)), log)
}

fn sample_schema() -> SchemaInfo {
    SchemaInfo {
        title: Some(String::from("Cargo Manifest")),
        description: Some(String::from("Schema for Cargo.toml")),
        toml_version: Some(String::from("v1.0.0")),
        uri: String::from("https://example.com/cargo.schema.json"),
        catalog_uri: None,
    }
}

fn toml_document() -> EditorDocument {
    EditorDocument::new("file:///workspace/Cargo.toml", "toml", 1, "")
}

#[rstest]
fn show_version_names_source_and_path() {
    let session = session_with_version("tombi 0.5.1");
    let feedback = RecordingFeedback::new();

    show_version(&session, &feedback);

    assert_eq!(
        feedback.messages(),
        [(
            FeedbackLevel::Info,
            String::from("Tombi Language Server 0.5.1 (system PATH: /usr/bin/tombi)"),
        )]
    );
}

#[rstest]
fn show_version_omits_path_for_bundled_binary() {
    let session = EngineSession::with_probe(
        ResolvedBinary::new(BinarySource::Bundled, "/extensions/tombi/server/tombi"),
        Box::new(FixedVersionProbe("tombi 0.5.1")),
    );
    let feedback = RecordingFeedback::new();

    show_version(&session, &feedback);

    assert_eq!(
        feedback.messages(),
        [(
            FeedbackLevel::Info,
            String::from("Tombi Language Server 0.5.1 (bundled)"),
        )]
    );
}

#[rstest]
fn show_version_reports_unknown_sentinel() {
    let session = session_with_failing_probe();
    let feedback = RecordingFeedback::new();

    show_version(&session, &feedback);

    let messages = feedback.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages.first().is_some_and(|(_, text)| text.contains("<unknown>")));
}

#[rstest]
fn restart_replaces_the_session() {
    let factory = RecordingClientFactory::new(ResponseSet::default());
    let log = factory.log();
    let initial = factory.create().expect("initial client should build");
    let slot = SessionSlot::new(initial);
    let feedback = RecordingFeedback::new();

    restart(&slot, &factory, &feedback);

    assert_eq!(factory.created(), 2, "restart must create a fresh client");
    assert_eq!(slot.generation(), 1);
    assert!(log.calls().contains(&RecordedCall::Shutdown));
    assert_eq!(
        feedback.messages(),
        [(
            FeedbackLevel::Info,
            String::from("Tombi Language Server restarted"),
        )]
    );
}

#[rstest]
fn failed_restart_keeps_the_previous_session() {
    let (slot, log) = recording_slot(ResponseSet::default());
    let factory = RecordingClientFactory::failing("spawn refused");
    let feedback = RecordingFeedback::new();

    restart(&slot, &factory, &feedback);

    assert_eq!(slot.generation(), 0, "generation must not advance");
    assert!(
        !log.calls().contains(&RecordedCall::Shutdown),
        "previous session must stay up"
    );
    let messages = feedback.messages();
    assert!(matches!(messages.as_slice(), [(FeedbackLevel::Error, _)]));
}

#[rstest]
fn refresh_cache_reports_success() {
    let (slot, log) = recording_slot(ResponseSet::default());
    let feedback = RecordingFeedback::new();

    refresh_cache(&slot, &feedback);

    assert_eq!(log.calls(), [RecordedCall::RefreshCache]);
    assert!(matches!(
        feedback.messages().as_slice(),
        [(FeedbackLevel::Info, _)]
    ));
}

#[rstest]
fn refresh_cache_reports_failure() {
    let mut responses = ResponseSet::default();
    responses.refresh_error = Some(String::from("cache locked"));
    let (slot, _log) = recording_slot(responses);
    let feedback = RecordingFeedback::new();

    refresh_cache(&slot, &feedback);

    let messages = feedback.messages();
    assert!(matches!(messages.as_slice(), [(FeedbackLevel::Error, _)]));
    assert!(messages.first().is_some_and(|(_, text)| text.contains("cache locked")));
}

#[rstest]
fn select_schema_is_gated_on_engine_version() {
    let session = session_with_version("tombi 0.3.9");
    let (slot, log) = recording_slot(ResponseSet::default());
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();

    select_schema(&session, &slot, Some(&toml_document()), &picker, &feedback);

    assert!(log.calls().is_empty(), "no protocol call below the gate");
    assert!(matches!(
        feedback.messages().as_slice(),
        [(FeedbackLevel::Warning, _)]
    ));
}

#[rstest]
fn select_schema_requires_an_active_editor() {
    let session = session_with_version("tombi 0.5.1");
    let (slot, log) = recording_slot(ResponseSet::default());
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();

    select_schema(&session, &slot, None, &picker, &feedback);

    assert!(log.calls().is_empty());
    assert_eq!(
        feedback.messages(),
        [(FeedbackLevel::Warning, String::from("No active editor"))]
    );
}

#[rstest]
fn select_schema_requires_a_toml_document() {
    let session = session_with_version("tombi 0.5.1");
    let (slot, log) = recording_slot(ResponseSet::default());
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();
    let document = EditorDocument::new("file:///notes.md", "markdown", 1, "");

    select_schema(&session, &slot, Some(&document), &picker, &feedback);

    assert!(log.calls().is_empty());
    assert!(matches!(
        feedback.messages().as_slice(),
        [(FeedbackLevel::Warning, _)]
    ));
}

#[rstest]
fn select_schema_requires_a_saved_file() {
    let session = session_with_version("tombi 0.5.1");
    let (slot, log) = recording_slot(ResponseSet::default());
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();
    let document = EditorDocument::new("untitled:Untitled-1", "toml", 1, "");

    select_schema(&session, &slot, Some(&document), &picker, &feedback);

    assert!(log.calls().is_empty());
    assert!(matches!(
        feedback.messages().as_slice(),
        [(FeedbackLevel::Warning, _)]
    ));
}

#[rstest]
fn select_schema_with_empty_list_informs_and_stops() {
    let session = session_with_version("tombi 0.5.1");
    let (slot, log) = recording_slot(ResponseSet::default());
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();

    select_schema(&session, &slot, Some(&toml_document()), &picker, &feedback);

    assert_eq!(log.calls(), [RecordedCall::ListSchemas]);
    assert_eq!(
        feedback.messages(),
        [(FeedbackLevel::Info, String::from("No schemas available"))]
    );
}

#[rstest]
fn select_schema_associates_exact_path_with_force() {
    let session = session_with_version("tombi 0.5.1");
    let mut responses = ResponseSet::default();
    responses.schemas = vec![sample_schema()];
    let (slot, log) = recording_slot(responses);
    let picker = FixedPicker::choosing(Some(0));
    let feedback = RecordingFeedback::new();

    select_schema(&session, &slot, Some(&toml_document()), &picker, &feedback);

    let calls = log.calls();
    match calls.as_slice() {
        [RecordedCall::ListSchemas, RecordedCall::AssociateSchema(params)] => {
            assert_eq!(params.uri, "https://example.com/cargo.schema.json");
            assert_eq!(params.file_match, [String::from("/workspace/Cargo.toml")]);
            assert_eq!(params.force, Some(true));
            assert_eq!(params.toml_version.as_deref(), Some("v1.0.0"));
        }
        other => panic!("expected list + associate, got {other:?}"),
    }
    assert_eq!(
        feedback.messages(),
        [(
            FeedbackLevel::Info,
            String::from("Schema \"Cargo Manifest\" applied successfully"),
        )]
    );

    let seen = picker.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen.first().is_some_and(|item| item.label == "Cargo Manifest"));
}

#[rstest]
fn cancelled_picker_is_silent() {
    let session = session_with_version("tombi 0.5.1");
    let mut responses = ResponseSet::default();
    responses.schemas = vec![sample_schema()];
    let (slot, log) = recording_slot(responses);
    let picker = FixedPicker::choosing(None);
    let feedback = RecordingFeedback::new();

    select_schema(&session, &slot, Some(&toml_document()), &picker, &feedback);

    assert_eq!(log.calls(), [RecordedCall::ListSchemas]);
    assert!(feedback.messages().is_empty());
}

#[rstest]
fn activation_fails_when_the_engine_cannot_launch() {
    let factory = RecordingClientFactory::failing("spawn refused");

    let error = EditorBridge::activate_with(session_with_version("0.5.1"), Box::new(factory))
        .expect_err("activation should fail");

    assert!(matches!(error, ActivationError::Launch { .. }));
}

#[rstest]
fn deactivation_hides_indicator_and_stops_engine() {
    let factory = RecordingClientFactory::new(ResponseSet::default());
    let log = factory.log();
    let mut bridge =
        EditorBridge::activate_with(session_with_version("tombi 0.6.0"), Box::new(factory))
            .expect("activation should succeed");
    let observer = RecordingObserver::new();
    bridge.subscribe_status(Box::new(observer.clone()));

    bridge.deactivate();

    assert_eq!(observer.events(), [ObservedStatus::Hidden]);
    assert!(log.calls().contains(&RecordedCall::Shutdown));
}

#[rstest]
fn dispatch_rejects_unknown_command() {
    let factory = RecordingClientFactory::new(ResponseSet::default());
    let bridge =
        EditorBridge::activate_with(session_with_version("tombi 0.6.0"), Box::new(factory))
            .expect("activation should succeed");
    let picker = FixedPicker::choosing(None);
    let feedback = RecordingFeedback::new();

    assert!(!bridge.dispatch_command("tombi.doesNotExist", &picker, &feedback));
    assert!(bridge.dispatch_command(crate::commands::COMMAND_REFRESH_CACHE, &picker, &feedback));
}
