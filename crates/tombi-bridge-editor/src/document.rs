//! Editor-agnostic document model and language recognition rules.

use std::str::FromStr;

use lsp_types::{DidOpenTextDocumentParams, TextDocumentItem, Uri};
use tracing::warn;
use url::Url;

/// Log target for document handling.
pub(crate) const DOCUMENT_TARGET: &str = "tombi_bridge::documents";

/// Language identifiers the engine handles as TOML.
pub const SUPPORT_TOML_LANGUAGES: [&str; 2] = ["toml", "cargoLock"];

/// Language identifiers treated as JSON for schema-update triggering.
pub const SUPPORT_JSON_LANGUAGES: [&str; 1] = ["json"];

/// Path suffixes recognized as engine configuration files.
pub const CONFIG_FILENAME_SUFFIXES: [&str; 3] =
    ["tombi.toml", "pyproject.toml", "tombi/config.toml"];

/// A text document as the editor presents it to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    /// Document URI as the editor renders it.
    pub uri: String,
    /// Editor language identifier (e.g. `toml`, `cargoLock`, `json`).
    pub language_id: String,
    /// Editor revision counter for the document.
    pub version: i32,
    /// Full document text.
    pub text: String,
}

impl EditorDocument {
    /// Builds a document value.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// Whether the document's language is one of the TOML-family ids.
    #[must_use]
    pub fn is_toml_family(&self) -> bool {
        SUPPORT_TOML_LANGUAGES.contains(&self.language_id.as_str())
    }

    /// Whether the document's language is the JSON id.
    #[must_use]
    pub fn is_json(&self) -> bool {
        SUPPORT_JSON_LANGUAGES.contains(&self.language_id.as_str())
    }

    /// Whether the document path ends with a recognized configuration
    /// filename.
    #[must_use]
    pub fn is_config_file(&self) -> bool {
        let path = uri_path(&self.uri);
        CONFIG_FILENAME_SUFFIXES
            .iter()
            .any(|suffix| path.ends_with(suffix))
    }

    /// Filesystem path of the document, when it is backed by a saved
    /// file.
    ///
    /// `None` for untitled buffers and other non-`file:` schemes.
    #[must_use]
    pub fn file_path(&self) -> Option<String> {
        let url = Url::parse(&self.uri).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path()
            .ok()
            .map(|path| path.to_string_lossy().into_owned())
    }

    /// Builds the `textDocument/didOpen` payload for this document.
    ///
    /// `None` (with a warning) when the editor handed over a URI that
    /// does not parse.
    #[must_use]
    pub fn to_open_params(&self) -> Option<DidOpenTextDocumentParams> {
        match Uri::from_str(&self.uri) {
            Ok(uri) => Some(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri,
                    language_id: self.language_id.clone(),
                    version: self.version,
                    text: self.text.clone(),
                },
            }),
            Err(error) => {
                warn!(
                    target: DOCUMENT_TARGET,
                    uri = %self.uri,
                    error = %error,
                    "document URI does not parse, skipping"
                );
                None
            }
        }
    }
}

/// Path portion of a document URI, falling back to the raw string for
/// inputs that do not parse as URLs.
fn uri_path(uri: &str) -> String {
    Url::parse(uri).map_or_else(|_| uri.to_owned(), |url| url.path().to_owned())
}
