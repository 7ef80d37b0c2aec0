//! Version values and wire-capability gating.
//!
//! The engine's request surface has grown across releases; the bridge
//! decides per capability which request shape to use by comparing the
//! session's cached version against a hard-coded minimum. Every gated
//! decision goes through [`EngineVersion`] so the comparison is
//! implemented exactly once.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Version string reported by development builds of the engine.
///
/// Bypasses gating entirely: a development build is assumed to carry
/// every capability.
pub const DEV_VERSION: &str = "0.0.0-dev";

/// A dot-separated sequence of non-negative integer components.
///
/// Missing trailing components compare as zero, so `"1.2"` and
/// `"1.2.0"` are equal.
#[derive(Debug, Clone)]
pub struct EngineVersion(Vec<u64>);

impl EngineVersion {
    /// Builds a version from explicit components.
    #[must_use]
    pub fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    /// Returns the component at `index`, treating absent trailing
    /// components as zero.
    fn component(&self, index: usize) -> u64 {
        self.0.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for EngineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EngineVersion {}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.0.len().max(other.0.len());
        for index in 0..width {
            match self.component(index).cmp(&other.component(index)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        formatter.write_str(&rendered)
    }
}

/// Errors raised when parsing a version string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unparsable version '{0}'")]
pub struct VersionParseError(String);

impl VersionParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for EngineVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError(input.to_owned()));
        }
        let components = trimmed
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionParseError(input.to_owned()))?;
        Ok(Self(components))
    }
}

/// A request-surface upgrade gated on a minimum engine version.
///
/// Each variant carries its own threshold and is evaluated
/// independently; new upgrades slot in as further variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireCapability {
    /// `tombi/getStatus`, the combined status query superseding the
    /// single-purpose `tombi/getTomlVersion`.
    CombinedStatus,
    /// `tombi/listSchemas` and `tombi/associateSchema`.
    SchemaSelection,
}

impl WireCapability {
    /// Minimum engine version carrying this capability.
    #[must_use]
    pub fn minimum(self) -> EngineVersion {
        match self {
            Self::CombinedStatus => EngineVersion::new(vec![0, 5, 0]),
            Self::SchemaSelection => EngineVersion::new(vec![0, 4, 0]),
        }
    }

    /// Whether the engine reporting `cached_version` carries this
    /// capability.
    ///
    /// The development sentinel passes every gate. An unparsable or
    /// sentinel-unknown version sits below every threshold, falling
    /// back to the legacy surface.
    #[must_use]
    pub fn supported_by(self, cached_version: &str) -> bool {
        if cached_version == DEV_VERSION {
            return true;
        }
        cached_version
            .parse::<EngineVersion>()
            .is_ok_and(|version| version >= self.minimum())
    }
}

/// Which status-query shape to use for a given engine version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDialect {
    /// `tombi/getTomlVersion`: version and source only.
    Legacy,
    /// `tombi/getStatus`: version, source, config path, ignore state.
    Combined,
}

/// Selects the status dialect for the supplied cached version.
#[must_use]
pub fn status_dialect(cached_version: &str) -> StatusDialect {
    if WireCapability::CombinedStatus.supported_by(cached_version) {
        StatusDialect::Combined
    } else {
        StatusDialect::Legacy
    }
}
