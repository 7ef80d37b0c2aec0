//! Engine-side half of the Tombi editor bridge.
#![deny(missing_docs)]
//!
//! The crate owns everything between "the editor activated" and "a
//! living language-server session": multi-source discovery of the
//! `tombi` executable, the long-lived session with its memoized version
//! probe, version-gated selection of request shapes, and the
//! process-backed JSON-RPC client. Engine specifics stay behind the
//! [`EngineClient`] trait so the editor layer and its tests can inject
//! lightweight implementations without spawning real processes.

pub mod adapter;
mod client;
mod requests;
mod resolver;
mod session;
mod version;

pub use client::{EngineClient, EngineClientError};
pub use requests::{
    AssociateSchemaParams, DocumentParams, IgnoreReason, ListSchemasResponse, SchemaInfo,
    StatusResponse, TomlVersionResponse, TomlVersionSource, methods,
};
pub use resolver::{
    BinarySource, DEBUG_BINARY_ENV, LANGUAGE_SERVER_BIN_NAME, ResolveError, ResolvedBinary,
    ResolverEnvironment, SystemEnvironment, WorkspaceContext, platform_binary_name,
    resolve_binary,
};
pub use session::{
    CommandVersionProbe, EngineSession, ProbeError, UNKNOWN_VERSION, VersionProbe,
};
pub use version::{
    DEV_VERSION, EngineVersion, StatusDialect, VersionParseError, WireCapability, status_dialect,
};
