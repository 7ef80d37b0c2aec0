//! [`EngineClient`] implementation for [`ProcessEngineClient`].

use lsp_types::{DidChangeConfigurationParams, DidOpenTextDocumentParams};

use super::process::ProcessEngineClient;
use crate::client::{EngineClient, EngineClientError};
use crate::requests::{
    AssociateSchemaParams, DocumentParams, ListSchemasResponse, StatusResponse,
    TomlVersionResponse, methods,
};

impl EngineClient for ProcessEngineClient {
    fn get_toml_version(
        &mut self,
        params: DocumentParams,
    ) -> Result<TomlVersionResponse, EngineClientError> {
        self.send_request(methods::GET_TOML_VERSION, params)
            .map_err(|e| EngineClientError::with_source("getTomlVersion request failed", e))
    }

    fn get_status(&mut self, params: DocumentParams) -> Result<StatusResponse, EngineClientError> {
        self.send_request(methods::GET_STATUS, params)
            .map_err(|e| EngineClientError::with_source("getStatus request failed", e))
    }

    fn update_config(&mut self, params: DocumentParams) -> Result<bool, EngineClientError> {
        self.send_request(methods::UPDATE_CONFIG, params)
            .map_err(|e| EngineClientError::with_source("updateConfig request failed", e))
    }

    fn update_schema(&mut self, params: DocumentParams) -> Result<bool, EngineClientError> {
        self.send_request(methods::UPDATE_SCHEMA, params)
            .map_err(|e| EngineClientError::with_source("updateSchema request failed", e))
    }

    fn list_schemas(&mut self) -> Result<ListSchemasResponse, EngineClientError> {
        self.send_request(methods::LIST_SCHEMAS, ())
            .map_err(|e| EngineClientError::with_source("listSchemas request failed", e))
    }

    fn associate_schema(
        &mut self,
        params: AssociateSchemaParams,
    ) -> Result<(), EngineClientError> {
        self.send_notification(methods::ASSOCIATE_SCHEMA, params)
            .map_err(|e| EngineClientError::with_source("associateSchema notification failed", e))
    }

    fn refresh_cache(&mut self) -> Result<bool, EngineClientError> {
        self.send_request(methods::REFRESH_CACHE, ())
            .map_err(|e| EngineClientError::with_source("refreshCache request failed", e))
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), EngineClientError> {
        self.send_notification("textDocument/didOpen", params)
            .map_err(|e| EngineClientError::with_source("didOpen notification failed", e))
    }

    fn did_change_configuration(
        &mut self,
        params: DidChangeConfigurationParams,
    ) -> Result<(), EngineClientError> {
        self.send_notification("workspace/didChangeConfiguration", params)
            .map_err(|e| {
                EngineClientError::with_source("didChangeConfiguration notification failed", e)
            })
    }

    fn shutdown(&mut self) -> Result<(), EngineClientError> {
        self.shutdown_process();
        Ok(())
    }
}
