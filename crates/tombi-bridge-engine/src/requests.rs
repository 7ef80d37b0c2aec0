//! Typed payloads for the engine's custom `tombi/*` operations.
//!
//! Field names follow the wire format (camelCase, kebab-case enum
//! values) so these types serialize byte-for-byte to what the engine
//! expects.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Method names for the engine's custom request surface.
pub mod methods {
    /// Legacy single-purpose status query.
    pub const GET_TOML_VERSION: &str = "tombi/getTomlVersion";
    /// Combined status query (version, source, config path, ignore).
    pub const GET_STATUS: &str = "tombi/getStatus";
    /// Reload the configuration backing a document.
    pub const UPDATE_CONFIG: &str = "tombi/updateConfig";
    /// Re-read a schema document after it was saved.
    pub const UPDATE_SCHEMA: &str = "tombi/updateSchema";
    /// Enumerate the schemas the engine currently knows about.
    pub const LIST_SCHEMAS: &str = "tombi/listSchemas";
    /// Bind a schema to a file-match pattern.
    pub const ASSOCIATE_SCHEMA: &str = "tombi/associateSchema";
    /// Drop and rebuild the engine's schema cache.
    pub const REFRESH_CACHE: &str = "tombi/refreshCache";
}

/// Document identifier carried by the per-document operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentParams {
    /// Document URI as the editor rendered it.
    pub uri: String,
}

impl DocumentParams {
    /// Builds params for the supplied URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Where the effective TOML version of a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TomlVersionSource {
    /// A version comment inside the document.
    Comment,
    /// The schema associated with the document.
    Schema,
    /// A configuration file.
    Config,
    /// The engine's built-in default.
    Default,
}

/// Why the engine is ignoring the queried document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IgnoreReason {
    /// No include pattern matched the document path.
    IncludeFilePatternNotMatched,
    /// An exclude pattern matched the document path.
    ExcludeFilePatternMatched,
}

/// Response to the legacy `tombi/getTomlVersion` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TomlVersionResponse {
    /// Effective TOML version for the document.
    pub toml_version: String,
    /// Where that version came from.
    pub source: TomlVersionSource,
}

/// Response to the combined `tombi/getStatus` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Effective TOML version for the document.
    pub toml_version: String,
    /// Where that version came from.
    pub source: TomlVersionSource,
    /// Configuration file the engine resolved for the document, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    /// Set when the engine is ignoring the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<IgnoreReason>,
}

/// One schema the engine offers for association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInfo {
    /// Human-readable schema title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer schema description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// TOML version the schema targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toml_version: Option<String>,
    /// Schema document URI.
    pub uri: String,
    /// Catalog the schema was discovered through, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_uri: Option<String>,
}

/// Response to `tombi/listSchemas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSchemasResponse {
    /// Schemas currently known to the engine.
    pub schemas: Vec<SchemaInfo>,
}

/// Parameters of the `tombi/associateSchema` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateSchemaParams {
    /// Human-readable schema title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer schema description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema document URI.
    pub uri: String,
    /// Paths or patterns the association applies to.
    pub file_match: Vec<String>,
    /// TOML version the schema targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toml_version: Option<String>,
    /// Insert the schema ahead of catalog-derived associations so an
    /// explicit user choice takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}
