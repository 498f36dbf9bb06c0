//! Provider registry for runtime provider lookup.
//!
//! An ordered, name-indexed registry of boxed source providers.
//! Registration order is the resolution order, so it determines which
//! provider wins a first-success dispatch.

use omnipkg_types::error::DispatchError;
use omnipkg_types::source::SourceOperation;

use super::box_provider::BoxSourceProvider;
use super::wildcard;

/// Registry of available source providers, in registration order.
///
/// Used by the dispatcher to resolve the candidate set for one dispatch
/// call. Resolution is a pure read over registry state: identical
/// arguments against an unchanged registry yield the same ordered
/// sequence.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<BoxSourceProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider.
    ///
    /// If a provider with the same name (case-insensitive) already
    /// exists, it is replaced in place, keeping its position.
    pub fn register(&mut self, provider: BoxSourceProvider) {
        match self
            .providers
            .iter()
            .position(|p| p.name().eq_ignore_ascii_case(provider.name()))
        {
            Some(idx) => self.providers[idx] = provider,
            None => self.providers.push(provider),
        }
    }

    /// Look up a provider by exact name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&BoxSourceProvider> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Resolve the ordered candidate set for one operation.
    ///
    /// - No filter: every provider declaring the operation, in
    ///   registration order.
    /// - Wildcard filter: capable providers whose names match the
    ///   pattern; zero matches is not an error at this layer.
    /// - Exact filter: the single named provider; unknown names or a
    ///   missing capability fail with `ProviderNotFound` before any
    ///   invocation occurs.
    pub fn find_capable(
        &self,
        operation: SourceOperation,
        filter: Option<&str>,
    ) -> Result<Vec<&BoxSourceProvider>, DispatchError> {
        let capable = self
            .providers
            .iter()
            .filter(|p| p.capabilities().supports(operation));

        match filter {
            None => Ok(capable.collect()),
            Some(pattern) if wildcard::is_pattern(pattern) => {
                Ok(capable.filter(|p| wildcard::matches(pattern, p.name())).collect())
            }
            Some(name) => {
                let provider = self
                    .get(name)
                    .filter(|p| p.capabilities().supports(operation))
                    .ok_or_else(|| DispatchError::ProviderNotFound {
                        name: name.to_string(),
                        operation,
                    })?;
                Ok(vec![provider])
            }
        }
    }

    /// All registered providers, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxSourceProvider> {
        self.providers.iter()
    }

    /// List all registered provider names.
    pub fn list_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
