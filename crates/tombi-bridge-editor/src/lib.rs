//! Editor-facing layer of the Tombi bridge.
#![deny(missing_docs)]
//!
//! Maps editor events (focus changes, saves, opens, commands) onto the
//! engine's protocol surface, and keeps the editor's status indicator
//! in sync with the engine's view of the active document. The editor
//! integration supplies small trait implementations — a status
//! observer, a feedback sink, a schema picker — and drives everything
//! through [`EditorBridge`].

mod bridge;
mod commands;
mod document;
mod documents;
mod presenter;
mod slot;
mod status;

#[cfg(test)]
mod tests;

pub use bridge::{ActivationError, EditorBridge, ProcessClientFactory};
pub use commands::{
    COMMAND_REFRESH_CACHE, COMMAND_RESTART, COMMAND_SELECT_SCHEMA, COMMAND_SHOW_VERSION,
    SchemaPickItem, SchemaPicker, UserFeedback,
};
pub use document::{
    CONFIG_FILENAME_SUFFIXES, EditorDocument, SUPPORT_JSON_LANGUAGES, SUPPORT_TOML_LANGUAGES,
};
pub use presenter::{QueryTicket, StatusObserver, StatusPresenter};
pub use slot::{EngineClientFactory, SessionSlot};
pub use status::{
    STATUS_UNKNOWN_TEXT, StatusRender, StatusSeverity, StatusSnapshot, render_failure,
    render_success,
};
