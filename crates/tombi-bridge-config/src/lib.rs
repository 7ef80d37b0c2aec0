//! Settings model for the Tombi editor bridge.
//!
//! Editors surface a `tombi` configuration section; this crate owns the
//! typed model of that section so the resolver and the process adapter
//! agree on what the user configured. The model is deliberately thin:
//! interpretation (tilde expansion, existence checks, argument splicing)
//! belongs to the consumers.

mod settings;

pub use settings::{SETTINGS_SECTION, ServerSettings, Settings, SettingsError};
