//! Test doubles shared by the behaviour tests.

use std::cell::RefCell;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lsp_types::{DidChangeConfigurationParams, DidOpenTextDocumentParams};
use tombi_bridge_engine::{
    AssociateSchemaParams, BinarySource, DocumentParams, EngineClient, EngineClientError,
    EngineSession, ListSchemasResponse, ProbeError, ResolvedBinary, SchemaInfo, StatusResponse,
    TomlVersionResponse, TomlVersionSource, VersionProbe,
};

use crate::commands::{SchemaPickItem, SchemaPicker, UserFeedback};
use crate::presenter::StatusObserver;
use crate::slot::EngineClientFactory;
use crate::status::StatusRender;

/// Everything a recording client can be asked over its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedCall {
    GetTomlVersion { uri: String },
    GetStatus { uri: String },
    UpdateConfig { uri: String },
    UpdateSchema { uri: String },
    ListSchemas,
    AssociateSchema(AssociateSchemaParams),
    RefreshCache,
    DidOpen { uri: String, language_id: String, version: i32, text: String },
    DidChangeConfiguration,
    Shutdown,
}

/// Canned responses for the recording client.
#[derive(Debug, Clone)]
pub(crate) struct ResponseSet {
    pub status: StatusResponse,
    pub status_error: Option<String>,
    pub toml_version: TomlVersionResponse,
    pub schemas: Vec<SchemaInfo>,
    pub schemas_error: Option<String>,
    pub refresh_error: Option<String>,
    pub associate_error: Option<String>,
}

impl Default for ResponseSet {
    fn default() -> Self {
        Self {
            status: StatusResponse {
                toml_version: String::from("v1.0.0"),
                source: TomlVersionSource::Default,
                config_path: None,
                ignore: None,
            },
            status_error: None,
            toml_version: TomlVersionResponse {
                toml_version: String::from("v1.0.0"),
                source: TomlVersionSource::Default,
            },
            schemas: Vec::new(),
            schemas_error: None,
            refresh_error: None,
            associate_error: None,
        }
    }
}

/// Shared view on the calls a recording client received.
#[derive(Clone)]
pub(crate) struct CallLog(Arc<Mutex<Vec<RecordedCall>>>);

impl CallLog {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.0
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    fn record(&self, call: RecordedCall) {
        self.0
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(call);
    }
}

/// [`EngineClient`] that records calls and answers from a
/// [`ResponseSet`].
pub(crate) struct RecordingEngineClient {
    log: CallLog,
    responses: ResponseSet,
}

impl RecordingEngineClient {
    pub(crate) fn new(responses: ResponseSet) -> Self {
        Self {
            log: CallLog::new(),
            responses,
        }
    }

    pub(crate) fn with_log(responses: ResponseSet, log: CallLog) -> Self {
        Self { log, responses }
    }

    pub(crate) fn log(&self) -> CallLog {
        self.log.clone()
    }
}

fn maybe_fail(error: &Option<String>) -> Result<(), EngineClientError> {
    match error {
        Some(message) => Err(EngineClientError::new(message.clone())),
        None => Ok(()),
    }
}

impl EngineClient for RecordingEngineClient {
    fn get_toml_version(
        &mut self,
        params: DocumentParams,
    ) -> Result<TomlVersionResponse, EngineClientError> {
        self.log.record(RecordedCall::GetTomlVersion { uri: params.uri });
        maybe_fail(&self.responses.status_error)?;
        Ok(self.responses.toml_version.clone())
    }

    fn get_status(&mut self, params: DocumentParams) -> Result<StatusResponse, EngineClientError> {
        self.log.record(RecordedCall::GetStatus { uri: params.uri });
        maybe_fail(&self.responses.status_error)?;
        Ok(self.responses.status.clone())
    }

    fn update_config(&mut self, params: DocumentParams) -> Result<bool, EngineClientError> {
        self.log.record(RecordedCall::UpdateConfig { uri: params.uri });
        Ok(true)
    }

    fn update_schema(&mut self, params: DocumentParams) -> Result<bool, EngineClientError> {
        self.log.record(RecordedCall::UpdateSchema { uri: params.uri });
        Ok(true)
    }

    fn list_schemas(&mut self) -> Result<ListSchemasResponse, EngineClientError> {
        self.log.record(RecordedCall::ListSchemas);
        maybe_fail(&self.responses.schemas_error)?;
        Ok(ListSchemasResponse {
            schemas: self.responses.schemas.clone(),
        })
    }

    fn associate_schema(
        &mut self,
        params: AssociateSchemaParams,
    ) -> Result<(), EngineClientError> {
        self.log.record(RecordedCall::AssociateSchema(params));
        maybe_fail(&self.responses.associate_error)
    }

    fn refresh_cache(&mut self) -> Result<bool, EngineClientError> {
        self.log.record(RecordedCall::RefreshCache);
        maybe_fail(&self.responses.refresh_error)?;
        Ok(true)
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), EngineClientError> {
        self.log.record(RecordedCall::DidOpen {
            uri: params.text_document.uri.as_str().to_owned(),
            language_id: params.text_document.language_id,
            version: params.text_document.version,
            text: params.text_document.text,
        });
        Ok(())
    }

    fn did_change_configuration(
        &mut self,
        _params: DidChangeConfigurationParams,
    ) -> Result<(), EngineClientError> {
        self.log.record(RecordedCall::DidChangeConfiguration);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), EngineClientError> {
        self.log.record(RecordedCall::Shutdown);
        Ok(())
    }
}

/// Factory producing recording clients that share one call log.
pub(crate) struct RecordingClientFactory {
    responses: ResponseSet,
    log: CallLog,
    created: AtomicUsize,
    fail_with: Option<String>,
}

impl RecordingClientFactory {
    pub(crate) fn new(responses: ResponseSet) -> Self {
        Self {
            responses,
            log: CallLog::new(),
            created: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            responses: ResponseSet::default(),
            log: CallLog::new(),
            created: AtomicUsize::new(0),
            fail_with: Some(message.to_owned()),
        }
    }

    pub(crate) fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl EngineClientFactory for RecordingClientFactory {
    fn create(&self) -> Result<Box<dyn EngineClient>, EngineClientError> {
        if let Some(message) = &self.fail_with {
            return Err(EngineClientError::new(message.clone()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingEngineClient::with_log(
            self.responses.clone(),
            self.log.clone(),
        )))
    }
}

/// Probe answering with a fixed version string.
pub(crate) struct FixedVersionProbe(pub(crate) &'static str);

impl VersionProbe for FixedVersionProbe {
    fn probe(&self, _binary: &Path) -> Result<String, ProbeError> {
        Ok(self.0.to_owned())
    }
}

/// Probe that always fails, yielding the unknown sentinel.
pub(crate) struct FailingProbe;

impl VersionProbe for FailingProbe {
    fn probe(&self, _binary: &Path) -> Result<String, ProbeError> {
        Err(ProbeError::Empty)
    }
}

/// Session whose version probe reports `version`.
pub(crate) fn session_with_version(version: &'static str) -> EngineSession {
    EngineSession::with_probe(
        ResolvedBinary::new(BinarySource::SystemPath, "/usr/bin/tombi"),
        Box::new(FixedVersionProbe(version)),
    )
}

/// Session whose version probe fails.
pub(crate) fn session_with_failing_probe() -> EngineSession {
    EngineSession::with_probe(
        ResolvedBinary::new(BinarySource::SystemPath, "/usr/bin/tombi"),
        Box::new(FailingProbe),
    )
}

/// Feedback level recorded by [`RecordingFeedback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedbackLevel {
    Info,
    Warning,
    Error,
}

/// [`UserFeedback`] sink capturing every toast.
#[derive(Default)]
pub(crate) struct RecordingFeedback {
    messages: RefCell<Vec<(FeedbackLevel, String)>>,
}

impl RecordingFeedback {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn messages(&self) -> Vec<(FeedbackLevel, String)> {
        self.messages.borrow().clone()
    }
}

impl UserFeedback for RecordingFeedback {
    fn info(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((FeedbackLevel::Info, message.to_owned()));
    }

    fn warning(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((FeedbackLevel::Warning, message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((FeedbackLevel::Error, message.to_owned()));
    }
}

/// Picker that always answers with a fixed choice.
pub(crate) struct FixedPicker {
    pub(crate) choice: Option<usize>,
    pub(crate) seen: RefCell<Vec<SchemaPickItem>>,
}

impl FixedPicker {
    pub(crate) fn choosing(choice: Option<usize>) -> Self {
        Self {
            choice,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl SchemaPicker for FixedPicker {
    fn pick(&self, items: &[SchemaPickItem]) -> Option<usize> {
        *self.seen.borrow_mut() = items.to_vec();
        self.choice
    }
}

/// What a status observer saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ObservedStatus {
    Shown(StatusRender),
    Hidden,
}

/// [`StatusObserver`] recording every transition.
#[derive(Clone, Default)]
pub(crate) struct RecordingObserver {
    events: std::rc::Rc<RefCell<Vec<ObservedStatus>>>,
}

impl RecordingObserver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<ObservedStatus> {
        self.events.borrow().clone()
    }
}

impl StatusObserver for RecordingObserver {
    fn status_changed(&self, render: &StatusRender) {
        self.events
            .borrow_mut()
            .push(ObservedStatus::Shown(render.clone()));
    }

    fn status_hidden(&self) {
        self.events.borrow_mut().push(ObservedStatus::Hidden);
    }
}
