//! Abstraction over a live engine session.

use std::error::Error;
use std::fmt;

use lsp_types::{DidChangeConfigurationParams, DidOpenTextDocumentParams};
use thiserror::Error;

use crate::requests::{
    AssociateSchemaParams, DocumentParams, ListSchemasResponse, StatusResponse,
    TomlVersionResponse,
};

/// Errors reported by engine client implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineClientError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl EngineClientError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Behaviour required from a live connection to the engine.
///
/// One method per protocol operation. The editor layer only ever talks
/// to this trait, so tests inject recording implementations without
/// spawning real engine processes.
pub trait EngineClient: Send {
    /// Legacy `tombi/getTomlVersion` query.
    fn get_toml_version(
        &mut self,
        params: DocumentParams,
    ) -> Result<TomlVersionResponse, EngineClientError>;

    /// Combined `tombi/getStatus` query.
    fn get_status(&mut self, params: DocumentParams) -> Result<StatusResponse, EngineClientError>;

    /// `tombi/updateConfig` request after a configuration file was saved.
    fn update_config(&mut self, params: DocumentParams) -> Result<bool, EngineClientError>;

    /// `tombi/updateSchema` request after a schema document was saved.
    fn update_schema(&mut self, params: DocumentParams) -> Result<bool, EngineClientError>;

    /// `tombi/listSchemas` query.
    fn list_schemas(&mut self) -> Result<ListSchemasResponse, EngineClientError>;

    /// `tombi/associateSchema` notification.
    fn associate_schema(
        &mut self,
        params: AssociateSchemaParams,
    ) -> Result<(), EngineClientError>;

    /// `tombi/refreshCache` request.
    fn refresh_cache(&mut self) -> Result<bool, EngineClientError>;

    /// `textDocument/didOpen` notification.
    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), EngineClientError>;

    /// `workspace/didChangeConfiguration` notification.
    fn did_change_configuration(
        &mut self,
        params: DidChangeConfigurationParams,
    ) -> Result<(), EngineClientError>;

    /// Graceful `shutdown`/`exit` teardown of the session.
    fn shutdown(&mut self) -> Result<(), EngineClientError>;
}

impl fmt::Debug for dyn EngineClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("EngineClient")
    }
}
