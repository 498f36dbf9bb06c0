//! SourceProvider trait definition.
//!
//! This is the core abstraction every package-management provider
//! implements. Uses native async fn in traits (RPITIT); object safety
//! for runtime provider selection is provided by `BoxSourceProvider`.

use std::future::Future;

use omnipkg_types::error::ProviderError;
use omnipkg_types::source::{
    GetSourceRequest, PackageSourceInfo, ProviderCapabilities, RegisterSourceRequest,
    SetSourceRequest, UnregisterSourceRequest,
};

/// Result of a single provider invocation for a mutating operation.
///
/// Completion and output-visibility are deliberately separate:
/// `Completed` always carries the resulting record, and the dispatcher
/// decides whether the caller sees it (pass-through). A provider that
/// does not manage the requested source returns `Declined`, which is
/// not an error -- the dispatcher simply tries the next candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The provider performed the operation.
    Completed(PackageSourceInfo),
    /// The source is not one this provider manages.
    Declined,
}

/// Trait for package-management provider backends.
///
/// Implementations live in `omnipkg-infra` (e.g., `LocalSourceProvider`).
/// A provider must only be invoked for operations its capabilities
/// declare; the registry enforces this during resolution.
pub trait SourceProvider: Send + Sync {
    /// Provider name used for lookup and error reporting (e.g., "local").
    fn name(&self) -> &str;

    /// Which source operations this provider supports.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// List registered sources matching the request's name pattern.
    fn get_sources(
        &self,
        request: &GetSourceRequest,
    ) -> impl Future<Output = Result<Vec<PackageSourceInfo>, ProviderError>> + Send;

    /// Update the configuration of an existing source.
    ///
    /// Fields left `None` in the request keep their stored value.
    fn set_source(
        &self,
        request: &SetSourceRequest,
    ) -> impl Future<Output = Result<SourceOutcome, ProviderError>> + Send;

    /// Register a new source.
    fn register_source(
        &self,
        request: &RegisterSourceRequest,
    ) -> impl Future<Output = Result<SourceOutcome, ProviderError>> + Send;

    /// Remove a registered source.
    fn unregister_source(
        &self,
        request: &UnregisterSourceRequest,
    ) -> impl Future<Output = Result<SourceOutcome, ProviderError>> + Send;
}
