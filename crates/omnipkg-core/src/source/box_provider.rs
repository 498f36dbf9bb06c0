//! BoxSourceProvider -- object-safe dynamic dispatch wrapper for SourceProvider.
//!
//! 1. Define an object-safe `SourceProviderDyn` trait with boxed futures
//! 2. Blanket-impl `SourceProviderDyn` for all `T: SourceProvider`
//! 3. `BoxSourceProvider` wraps `Box<dyn SourceProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use omnipkg_types::error::ProviderError;
use omnipkg_types::source::{
    GetSourceRequest, PackageSourceInfo, ProviderCapabilities, RegisterSourceRequest,
    SetSourceRequest, UnregisterSourceRequest,
};

use super::provider::{SourceOutcome, SourceProvider};

/// Object-safe version of [`SourceProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch
/// (`dyn SourceProviderDyn`). A blanket implementation is provided for
/// all types implementing `SourceProvider`.
pub trait SourceProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    fn get_sources_boxed<'a>(
        &'a self,
        request: &'a GetSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PackageSourceInfo>, ProviderError>> + Send + 'a>>;

    fn set_source_boxed<'a>(
        &'a self,
        request: &'a SetSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>>;

    fn register_source_boxed<'a>(
        &'a self,
        request: &'a RegisterSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>>;

    fn unregister_source_boxed<'a>(
        &'a self,
        request: &'a UnregisterSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>>;
}

/// Blanket implementation: any `SourceProvider` automatically implements
/// `SourceProviderDyn`.
impl<T: SourceProvider> SourceProviderDyn for T {
    fn name(&self) -> &str {
        SourceProvider::name(self)
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        SourceProvider::capabilities(self)
    }

    fn get_sources_boxed<'a>(
        &'a self,
        request: &'a GetSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PackageSourceInfo>, ProviderError>> + Send + 'a>>
    {
        Box::pin(self.get_sources(request))
    }

    fn set_source_boxed<'a>(
        &'a self,
        request: &'a SetSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>> {
        Box::pin(self.set_source(request))
    }

    fn register_source_boxed<'a>(
        &'a self,
        request: &'a RegisterSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>> {
        Box::pin(self.register_source(request))
    }

    fn unregister_source_boxed<'a>(
        &'a self,
        request: &'a UnregisterSourceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceOutcome, ProviderError>> + Send + 'a>> {
        Box::pin(self.unregister_source(request))
    }
}

/// Type-erased source provider for runtime provider selection.
///
/// Since `SourceProvider` uses RPITIT, it cannot be used as a trait
/// object directly. `BoxSourceProvider` provides equivalent methods that
/// delegate to the inner `SourceProviderDyn` trait object.
pub struct BoxSourceProvider {
    inner: Box<dyn SourceProviderDyn + Send + Sync>,
}

impl std::fmt::Debug for BoxSourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxSourceProvider").finish_non_exhaustive()
    }
}

impl BoxSourceProvider {
    /// Wrap a concrete `SourceProvider` in a type-erased box.
    pub fn new<T: SourceProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Which source operations this provider supports.
    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.inner.capabilities()
    }

    /// List registered sources matching the request's name pattern.
    pub async fn get_sources(
        &self,
        request: &GetSourceRequest,
    ) -> Result<Vec<PackageSourceInfo>, ProviderError> {
        self.inner.get_sources_boxed(request).await
    }

    /// Update the configuration of an existing source.
    pub async fn set_source(
        &self,
        request: &SetSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        self.inner.set_source_boxed(request).await
    }

    /// Register a new source.
    pub async fn register_source(
        &self,
        request: &RegisterSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        self.inner.register_source_boxed(request).await
    }

    /// Remove a registered source.
    pub async fn unregister_source(
        &self,
        request: &UnregisterSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        self.inner.unregister_source_boxed(request).await
    }
}
