//! Activation context tying the bridge together.

use thiserror::Error;
use tombi_bridge_config::Settings;
use tombi_bridge_engine::adapter::{LaunchConfig, ProcessEngineClient};
use tombi_bridge_engine::{
    EngineClient, EngineClientError, EngineSession, ResolveError, SystemEnvironment,
    WorkspaceContext, resolve_binary,
};
use tracing::info;

use crate::commands::{
    self, COMMAND_REFRESH_CACHE, COMMAND_RESTART, COMMAND_SELECT_SCHEMA, COMMAND_SHOW_VERSION,
    SchemaPicker, UserFeedback,
};
use crate::document::EditorDocument;
use crate::documents;
use crate::presenter::{StatusObserver, StatusPresenter};
use crate::slot::{EngineClientFactory, SessionSlot};

/// Log target for activation and teardown.
const BRIDGE_TARGET: &str = "tombi_bridge::bridge";

/// Errors that abort activation.
///
/// Nothing past activation raises: later failures become UI state or
/// feedback messages.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// No discovery source yielded a binary.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The engine process could not be launched.
    #[error("failed to start the tombi language server: {source}")]
    Launch {
        /// Underlying launch error.
        #[source]
        source: EngineClientError,
    },
}

/// Factory spawning real engine processes.
pub struct ProcessClientFactory {
    config: LaunchConfig,
}

impl ProcessClientFactory {
    /// Builds a factory for the supplied launch configuration.
    #[must_use]
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }
}

impl EngineClientFactory for ProcessClientFactory {
    fn create(&self) -> Result<Box<dyn EngineClient>, EngineClientError> {
        let client = ProcessEngineClient::new(self.config.clone());
        client
            .launch()
            .map_err(|error| EngineClientError::with_source("failed to launch the engine", error))?;
        Ok(Box::new(client))
    }
}

/// One editor window's connection to the engine.
///
/// Constructed once at activation and torn down at deactivation; every
/// event and command handler is a method, so there is no global
/// "current instance" anywhere.
pub struct EditorBridge {
    session: EngineSession,
    slot: SessionSlot,
    factory: Box<dyn EngineClientFactory>,
    presenter: StatusPresenter,
    active_document: Option<EditorDocument>,
}

impl EditorBridge {
    /// Activates against the real environment: resolves the binary,
    /// spawns the engine, and runs the handshake.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivationError`] when no binary can be resolved or
    /// the engine fails to launch; no session exists in either case.
    pub fn activate(
        settings: &Settings,
        workspace: &WorkspaceContext,
    ) -> Result<Self, ActivationError> {
        let resolved = resolve_binary(settings, workspace, &SystemEnvironment)?;
        let config = LaunchConfig::from_settings(&resolved, settings);
        let session = EngineSession::new(resolved);
        Self::activate_with(session, Box::new(ProcessClientFactory::new(config)))
    }

    /// Activates with explicit session and client factory.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::Launch`] when the factory cannot
    /// produce a client.
    pub fn activate_with(
        session: EngineSession,
        factory: Box<dyn EngineClientFactory>,
    ) -> Result<Self, ActivationError> {
        let client = factory
            .create()
            .map_err(|source| ActivationError::Launch { source })?;
        info!(target: BRIDGE_TARGET, "bridge activated");
        Ok(Self {
            session,
            slot: SessionSlot::new(client),
            factory,
            presenter: StatusPresenter::new(),
            active_document: None,
        })
    }

    /// The session backing this bridge.
    #[must_use]
    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// Attaches a status observer (typically the editor's status-bar
    /// item).
    pub fn subscribe_status(&mut self, observer: Box<dyn StatusObserver>) {
        self.presenter.subscribe(observer);
    }

    /// Replays `didOpen` for documents already open at activation.
    pub fn announce_open_documents(&self, open_documents: &[EditorDocument]) {
        documents::announce_open_documents(&self.slot, open_documents);
    }

    /// Editor focus moved to a (possibly absent) document.
    pub fn active_document_changed(&mut self, document: Option<&EditorDocument>) {
        self.active_document = document.cloned();
        self.refresh_status();
    }

    /// A document was opened.
    pub fn document_opened(&self, document: &EditorDocument) {
        documents::document_opened(&self.slot, document);
    }

    /// A document was saved.
    pub fn document_saved(&mut self, document: &EditorDocument) {
        documents::document_saved(&self.slot, document);
        self.refresh_status();
    }

    /// The editor's settings changed.
    pub fn settings_changed(&self) {
        documents::settings_changed(&self.slot);
    }

    /// Dispatches a command by its identifier.
    ///
    /// Returns whether the identifier named a bridge command.
    pub fn dispatch_command(
        &self,
        command: &str,
        picker: &dyn SchemaPicker,
        feedback: &dyn UserFeedback,
    ) -> bool {
        match command {
            COMMAND_SHOW_VERSION => self.show_language_server_version(feedback),
            COMMAND_RESTART => self.restart_language_server(feedback),
            COMMAND_REFRESH_CACHE => self.refresh_cache(feedback),
            COMMAND_SELECT_SCHEMA => self.select_schema(picker, feedback),
            _ => return false,
        }
        true
    }

    /// Presents the engine version and resolution source.
    pub fn show_language_server_version(&self, feedback: &dyn UserFeedback) {
        commands::show_version(&self.session, feedback);
    }

    /// Stops and relaunches the engine session.
    pub fn restart_language_server(&self, feedback: &dyn UserFeedback) {
        commands::restart(&self.slot, self.factory.as_ref(), feedback);
    }

    /// Asks the engine to rebuild its schema cache.
    pub fn refresh_cache(&self, feedback: &dyn UserFeedback) {
        commands::refresh_cache(&self.slot, feedback);
    }

    /// Lets the user bind a schema to the active document.
    pub fn select_schema(&self, picker: &dyn SchemaPicker, feedback: &dyn UserFeedback) {
        commands::select_schema(
            &self.session,
            &self.slot,
            self.active_document.as_ref(),
            picker,
            feedback,
        );
    }

    /// Tears the bridge down: hides the indicator and stops the engine.
    pub fn deactivate(&mut self) {
        self.presenter.hide();
        self.slot.shutdown();
        info!(target: BRIDGE_TARGET, "bridge deactivated");
    }

    fn refresh_status(&mut self) {
        let Self {
            session,
            slot,
            presenter,
            active_document,
            ..
        } = self;
        let version = session.show_version();
        presenter.refresh(active_document.as_ref(), &version, slot);
    }
}

impl std::fmt::Debug for EditorBridge {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("EditorBridge")
            .field("session", &self.session)
            .field("slot", &self.slot)
            .field(
                "active_document",
                &self.active_document.as_ref().map(|doc| doc.uri.as_str()),
            )
            .finish()
    }
}
