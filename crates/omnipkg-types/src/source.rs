//! Package source types for omnipkg.
//!
//! These types model the data shapes of the provider dispatch protocol:
//! the source record providers emit, the per-operation requests, and the
//! capability declarations the registry filters on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named source operation a provider may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOperation {
    GetSource,
    SetSource,
    RegisterSource,
    UnregisterSource,
}

impl fmt::Display for SourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOperation::GetSource => write!(f, "get source"),
            SourceOperation::SetSource => write!(f, "set source"),
            SourceOperation::RegisterSource => write!(f, "register source"),
            SourceOperation::UnregisterSource => write!(f, "unregister source"),
        }
    }
}

impl std::str::FromStr for SourceOperation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" | "get_source" => Ok(SourceOperation::GetSource),
            "set" | "set_source" => Ok(SourceOperation::SetSource),
            "register" | "register_source" => Ok(SourceOperation::RegisterSource),
            "unregister" | "unregister_source" => Ok(SourceOperation::UnregisterSource),
            _ => Err(ParseOperationError(s.to_string())),
        }
    }
}

/// Error parsing a [`SourceOperation`] from a string.
#[derive(Debug, thiserror::Error)]
#[error("unknown source operation '{0}'")]
pub struct ParseOperationError(String);

/// Operations a provider declares support for.
///
/// The registry consults these when resolving candidate providers; a
/// provider is never invoked for an operation it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    pub get_source: bool,
    pub set_source: bool,
    pub register_source: bool,
    pub unregister_source: bool,
}

impl ProviderCapabilities {
    /// Capabilities declaring every source operation.
    pub const fn all() -> Self {
        Self {
            get_source: true,
            set_source: true,
            register_source: true,
            unregister_source: true,
        }
    }

    /// Whether the given operation is declared.
    pub const fn supports(&self, operation: SourceOperation) -> bool {
        match operation {
            SourceOperation::GetSource => self.get_source,
            SourceOperation::SetSource => self.set_source,
            SourceOperation::RegisterSource => self.register_source,
            SourceOperation::UnregisterSource => self.unregister_source,
        }
    }
}

/// A registered package source as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSourceInfo {
    /// Source name (e.g., "pkgs.example").
    pub name: String,
    /// Feed location (URL or path).
    pub location: String,
    /// Name of the provider that manages this source.
    pub provider: String,
    /// Whether packages from this source are trusted.
    pub trusted: bool,
}

/// Request to update the configuration of an existing source.
///
/// `location` and `trusted` are tri-state: `None` means "do not change";
/// `Some("")` is a valid explicit empty value.
#[derive(Debug, Clone)]
pub struct SetSourceRequest {
    pub name: String,
    pub location: Option<String>,
    pub trusted: Option<bool>,
    /// Whether the caller wants the resulting record surfaced.
    pub pass_through: bool,
}

/// Request to register a new source.
#[derive(Debug, Clone)]
pub struct RegisterSourceRequest {
    pub name: String,
    pub location: String,
    pub trusted: Option<bool>,
    /// Replace an existing source with the same name instead of failing.
    pub force: bool,
    pub pass_through: bool,
}

/// Request to remove a registered source.
#[derive(Debug, Clone)]
pub struct UnregisterSourceRequest {
    pub name: String,
    pub pass_through: bool,
}

/// Request to list registered sources.
#[derive(Debug, Clone)]
pub struct GetSourceRequest {
    /// Source name to match; may contain `*` and `?` wildcards.
    pub name: String,
}
