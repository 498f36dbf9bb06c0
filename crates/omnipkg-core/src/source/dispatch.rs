//! First-win dispatch across candidate source providers.
//!
//! Drives one source operation to completion: resolves the candidate
//! providers from the registry, invokes them sequentially in resolution
//! order, stops at the first provider that completes, isolates and
//! accumulates per-provider faults, and propagates cancellation
//! immediately. Invocation is strictly sequential: "first success wins"
//! requires observing each outcome before deciding whether to continue,
//! and two providers must never mutate the same source concurrently.

use tokio_util::sync::CancellationToken;

use omnipkg_types::error::{DispatchError, ProviderError, SourceError};
use omnipkg_types::source::{
    GetSourceRequest, PackageSourceInfo, RegisterSourceRequest, SetSourceRequest, SourceOperation,
    UnregisterSourceRequest,
};

use super::box_provider::BoxSourceProvider;
use super::provider::SourceOutcome;
use super::registry::ProviderRegistry;

/// Result of one dispatch call.
///
/// One report is produced per dispatch call and never shared across
/// calls. For mutating operations `provider` names the single provider
/// that completed; for `get` the records in `emitted` are concatenated
/// across all capable providers.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Name of the provider that completed a mutating operation, if any.
    pub provider: Option<String>,
    /// Records surfaced to the caller. For mutating operations this is
    /// populated only when the request asked for pass-through.
    pub emitted: Vec<PackageSourceInfo>,
    /// Per-provider faults in invocation order. When nothing succeeded,
    /// the terminal error naming the original target is last.
    pub errors: Vec<SourceError>,
}

impl DispatchReport {
    /// Whether any provider completed the operation.
    pub fn succeeded(&self) -> bool {
        self.provider.is_some() || !self.emitted.is_empty()
    }
}

/// A mutating source request paired with the provider method it targets.
///
/// Lets the first-win loop stay generic over set/register/unregister
/// without dynamic lookup by operation name.
enum MutateRequest<'r> {
    Set(&'r SetSourceRequest),
    Register(&'r RegisterSourceRequest),
    Unregister(&'r UnregisterSourceRequest),
}

impl MutateRequest<'_> {
    fn operation(&self) -> SourceOperation {
        match self {
            MutateRequest::Set(_) => SourceOperation::SetSource,
            MutateRequest::Register(_) => SourceOperation::RegisterSource,
            MutateRequest::Unregister(_) => SourceOperation::UnregisterSource,
        }
    }

    fn name(&self) -> &str {
        match self {
            MutateRequest::Set(r) => &r.name,
            MutateRequest::Register(r) => &r.name,
            MutateRequest::Unregister(r) => &r.name,
        }
    }

    fn pass_through(&self) -> bool {
        match self {
            MutateRequest::Set(r) => r.pass_through,
            MutateRequest::Register(r) => r.pass_through,
            MutateRequest::Unregister(r) => r.pass_through,
        }
    }

    async fn invoke(
        &self,
        provider: &BoxSourceProvider,
    ) -> Result<SourceOutcome, ProviderError> {
        match self {
            MutateRequest::Set(r) => provider.set_source(r).await,
            MutateRequest::Register(r) => provider.register_source(r).await,
            MutateRequest::Unregister(r) => provider.unregister_source(r).await,
        }
    }
}

/// Dispatches source operations across the registered providers.
///
/// Borrows the registry for the duration of one dispatch call; candidate
/// sequences are resolved fresh per call and discarded afterwards.
pub struct SourceDispatcher<'a> {
    registry: &'a ProviderRegistry,
    cancel: CancellationToken,
}

impl<'a> SourceDispatcher<'a> {
    /// Create a dispatcher over the given registry.
    ///
    /// Cancelling the token aborts any in-flight dispatch before its
    /// next provider invocation.
    pub fn new(registry: &'a ProviderRegistry, cancel: CancellationToken) -> Self {
        Self { registry, cancel }
    }

    /// Update an existing source's configuration. First provider to
    /// complete wins.
    pub async fn set_source(
        &self,
        request: &SetSourceRequest,
        filter: Option<&str>,
    ) -> Result<DispatchReport, DispatchError> {
        self.dispatch_first_win(MutateRequest::Set(request), filter).await
    }

    /// Register a new source. First provider to complete wins.
    pub async fn register_source(
        &self,
        request: &RegisterSourceRequest,
        filter: Option<&str>,
    ) -> Result<DispatchReport, DispatchError> {
        self.dispatch_first_win(MutateRequest::Register(request), filter).await
    }

    /// Remove a registered source. First provider to complete wins.
    pub async fn unregister_source(
        &self,
        request: &UnregisterSourceRequest,
        filter: Option<&str>,
    ) -> Result<DispatchReport, DispatchError> {
        self.dispatch_first_win(MutateRequest::Unregister(request), filter).await
    }

    /// List registered sources across every capable provider.
    ///
    /// Unlike the mutating operations there is no short-circuit: results
    /// are concatenated in provider order, and a fault from one provider
    /// never prevents querying the next.
    pub async fn get_sources(
        &self,
        request: &GetSourceRequest,
        filter: Option<&str>,
    ) -> Result<DispatchReport, DispatchError> {
        let candidates = self
            .registry
            .find_capable(SourceOperation::GetSource, filter)?;
        let mut report = DispatchReport::default();

        for provider in candidates {
            if self.cancel.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }

            tracing::debug!(provider = %provider.name(), "Querying provider for sources");

            match provider.get_sources(request).await {
                Ok(sources) => report.emitted.extend(sources),
                Err(ProviderError::Cancelled) => return Err(DispatchError::Cancelled),
                Err(ProviderError::Fault(message)) => {
                    tracing::warn!(provider = %provider.name(), error = %message, "Provider failed, continuing");
                    report.errors.push(SourceError::ProviderFault {
                        provider: provider.name().to_string(),
                        message,
                    });
                }
            }
        }

        if report.emitted.is_empty() {
            report.errors.push(SourceError::SourceNotFound {
                name: request.name.clone(),
            });
        }

        Ok(report)
    }

    async fn dispatch_first_win(
        &self,
        request: MutateRequest<'_>,
        filter: Option<&str>,
    ) -> Result<DispatchReport, DispatchError> {
        let operation = request.operation();
        let candidates = self.registry.find_capable(operation, filter)?;
        let mut report = DispatchReport::default();

        for provider in candidates {
            if self.cancel.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }

            tracing::debug!(provider = %provider.name(), %operation, "Calling provider");

            match request.invoke(provider).await {
                Ok(SourceOutcome::Completed(info)) => {
                    report.provider = Some(provider.name().to_string());
                    if request.pass_through() {
                        report.emitted.push(info);
                    }
                    // Only the first provider to complete is authoritative.
                    break;
                }
                Ok(SourceOutcome::Declined) => {
                    tracing::debug!(provider = %provider.name(), "Provider declined");
                }
                Err(ProviderError::Cancelled) => return Err(DispatchError::Cancelled),
                Err(ProviderError::Fault(message)) => {
                    tracing::warn!(provider = %provider.name(), error = %message, "Provider failed, trying next");
                    report.errors.push(SourceError::ProviderFault {
                        provider: provider.name().to_string(),
                        message,
                    });
                }
            }
        }

        if report.provider.is_none() {
            report.errors.push(SourceError::NoProviderSucceeded {
                name: request.name().to_string(),
                operation,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::provider::SourceProvider;
    use omnipkg_types::source::ProviderCapabilities;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Mock providers ---

    #[derive(Clone)]
    enum MockBehavior {
        Complete,
        Decline,
        Fault(String),
        Cancel,
    }

    struct MockProvider {
        name: String,
        capabilities: ProviderCapabilities,
        behavior: MockBehavior,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn new(name: &str, behavior: MockBehavior) -> (BoxSourceProvider, Arc<AtomicUsize>) {
            Self::with_capabilities(name, ProviderCapabilities::all(), behavior)
        }

        fn with_capabilities(
            name: &str,
            capabilities: ProviderCapabilities,
            behavior: MockBehavior,
        ) -> (BoxSourceProvider, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = BoxSourceProvider::new(Self {
                name: name.to_string(),
                capabilities,
                behavior,
                calls: calls.clone(),
            });
            (provider, calls)
        }

        fn outcome(&self, name: &str) -> Result<SourceOutcome, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Complete => Ok(SourceOutcome::Completed(PackageSourceInfo {
                    name: name.to_string(),
                    location: "https://example.test/feed".to_string(),
                    provider: self.name.clone(),
                    trusted: true,
                })),
                MockBehavior::Decline => Ok(SourceOutcome::Declined),
                MockBehavior::Fault(message) => Err(ProviderError::Fault(message.clone())),
                MockBehavior::Cancel => Err(ProviderError::Cancelled),
            }
        }
    }

    impl SourceProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn get_sources(
            &self,
            request: &GetSourceRequest,
        ) -> Result<Vec<PackageSourceInfo>, ProviderError> {
            match self.outcome(&request.name)? {
                SourceOutcome::Completed(info) => Ok(vec![info]),
                SourceOutcome::Declined => Ok(Vec::new()),
            }
        }

        async fn set_source(
            &self,
            request: &SetSourceRequest,
        ) -> Result<SourceOutcome, ProviderError> {
            self.outcome(&request.name)
        }

        async fn register_source(
            &self,
            request: &RegisterSourceRequest,
        ) -> Result<SourceOutcome, ProviderError> {
            self.outcome(&request.name)
        }

        async fn unregister_source(
            &self,
            request: &UnregisterSourceRequest,
        ) -> Result<SourceOutcome, ProviderError> {
            self.outcome(&request.name)
        }
    }

    fn set_request(pass_through: bool) -> SetSourceRequest {
        SetSourceRequest {
            name: "pkgs.foo".to_string(),
            location: Some("https://example.test/feed".to_string()),
            trusted: Some(true),
            pass_through,
        }
    }

    fn dispatcher(registry: &ProviderRegistry) -> SourceDispatcher<'_> {
        SourceDispatcher::new(registry, CancellationToken::new())
    }

    // --- First-win dispatch ---

    #[tokio::test]
    async fn test_single_provider_completes() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Complete);
        registry.register(foo);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.provider.as_deref(), Some("Foo"));
        assert!(report.errors.is_empty());
        assert!(report.emitted.is_empty()); // no pass-through requested
    }

    #[tokio::test]
    async fn test_declining_provider_falls_through_to_next() {
        let mut registry = ProviderRegistry::new();
        let (foo, foo_calls) = MockProvider::new("Foo", MockBehavior::Decline);
        let (bar, bar_calls) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.provider.as_deref(), Some("Bar"));
        assert!(report.errors.is_empty()); // declining is not an error
        assert_eq!(foo_calls.load(Ordering::SeqCst), 1);
        assert_eq!(bar_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_circuit_after_first_completion() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Complete);
        let (bar, bar_calls) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert_eq!(report.provider.as_deref(), Some("Foo"));
        assert_eq!(bar_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fault_is_isolated_and_accumulated() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Fault("disk full".to_string()));
        let (bar, bar_calls) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.provider.as_deref(), Some("Bar"));
        assert_eq!(bar_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            SourceError::ProviderFault { provider, message }
                if provider == "Foo" && message == "disk full"
        ));
    }

    #[tokio::test]
    async fn test_all_faulting_ends_with_terminal_error() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Fault("disk full".to_string()));
        registry.register(foo);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            &report.errors[0],
            SourceError::ProviderFault { provider, message }
                if provider == "Foo" && message == "disk full"
        ));
        assert!(matches!(
            report.errors.last().unwrap(),
            SourceError::NoProviderSucceeded { name, .. } if name == "pkgs.foo"
        ));
    }

    #[tokio::test]
    async fn test_empty_candidate_list_falls_to_terminal_error() {
        let registry = ProviderRegistry::new();

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            SourceError::NoProviderSucceeded { name, .. } if name == "pkgs.foo"
        ));
    }

    #[tokio::test]
    async fn test_unknown_provider_filter_fails_before_any_invocation() {
        let mut registry = ProviderRegistry::new();
        let (foo, foo_calls) = MockProvider::new("Foo", MockBehavior::Complete);
        registry.register(foo);

        let err = dispatcher(&registry)
            .set_source(&set_request(false), Some("Unknown"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::ProviderNotFound { ref name, .. } if name == "Unknown"
        ));
        assert_eq!(foo_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pass_through_emits_exactly_one_record() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Complete);
        registry.register(foo);

        let report = dispatcher(&registry)
            .set_source(&set_request(true), None)
            .await
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.emitted.len(), 1);
        assert_eq!(report.emitted[0].name, "pkgs.foo");
        assert_eq!(report.emitted[0].provider, "Foo");
    }

    #[tokio::test]
    async fn test_provider_cancellation_propagates_and_stops_iteration() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Cancel);
        let (bar, bar_calls) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let err = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Cancelled));
        assert_eq!(bar_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_before_first_invocation() {
        let mut registry = ProviderRegistry::new();
        let (foo, foo_calls) = MockProvider::new("Foo", MockBehavior::Complete);
        registry.register(foo);

        let token = CancellationToken::new();
        token.cancel();
        let dispatcher = SourceDispatcher::new(&registry, token);

        let err = dispatcher
            .set_source(&set_request(false), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Cancelled));
        assert_eq!(foo_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wildcard_filter_with_zero_matches_is_no_success_not_an_error() {
        let mut registry = ProviderRegistry::new();
        let (foo, foo_calls) = MockProvider::new("Foo", MockBehavior::Complete);
        registry.register(foo);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), Some("nuget*"))
            .await
            .unwrap();

        assert!(!report.succeeded());
        assert_eq!(foo_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            report.errors.last().unwrap(),
            SourceError::NoProviderSucceeded { .. }
        ));
    }

    #[tokio::test]
    async fn test_incapable_provider_is_never_invoked() {
        let mut registry = ProviderRegistry::new();
        let (foo, foo_calls) = MockProvider::with_capabilities(
            "Foo",
            ProviderCapabilities {
                get_source: true,
                ..Default::default()
            },
            MockBehavior::Complete,
        );
        let (bar, _) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let report = dispatcher(&registry)
            .set_source(&set_request(false), None)
            .await
            .unwrap();

        assert_eq!(report.provider.as_deref(), Some("Bar"));
        assert_eq!(foo_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_and_unregister_use_first_win_dispatch() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Decline);
        let (bar, _) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let register = RegisterSourceRequest {
            name: "pkgs.foo".to_string(),
            location: "https://example.test/feed".to_string(),
            trusted: None,
            force: false,
            pass_through: false,
        };
        let report = dispatcher(&registry)
            .register_source(&register, None)
            .await
            .unwrap();
        assert_eq!(report.provider.as_deref(), Some("Bar"));

        let unregister = UnregisterSourceRequest {
            name: "pkgs.foo".to_string(),
            pass_through: true,
        };
        let report = dispatcher(&registry)
            .unregister_source(&unregister, None)
            .await
            .unwrap();
        assert_eq!(report.provider.as_deref(), Some("Bar"));
        assert_eq!(report.emitted.len(), 1);
    }

    // --- Collect-all dispatch (get) ---

    #[tokio::test]
    async fn test_get_collects_from_all_capable_providers() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Complete);
        let (bar, _) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let request = GetSourceRequest {
            name: "*".to_string(),
        };
        let report = dispatcher(&registry).get_sources(&request, None).await.unwrap();

        assert!(report.succeeded());
        assert_eq!(report.emitted.len(), 2);
        assert_eq!(report.emitted[0].provider, "Foo"); // provider order preserved
        assert_eq!(report.emitted[1].provider, "Bar");
    }

    #[tokio::test]
    async fn test_get_isolates_faults_and_keeps_querying() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Fault("offline".to_string()));
        let (bar, _) = MockProvider::new("Bar", MockBehavior::Complete);
        registry.register(foo);
        registry.register(bar);

        let request = GetSourceRequest {
            name: "pkgs.foo".to_string(),
        };
        let report = dispatcher(&registry).get_sources(&request, None).await.unwrap();

        assert!(report.succeeded());
        assert_eq!(report.emitted.len(), 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_get_with_no_results_reports_source_not_found() {
        let mut registry = ProviderRegistry::new();
        let (foo, _) = MockProvider::new("Foo", MockBehavior::Decline);
        registry.register(foo);

        let request = GetSourceRequest {
            name: "pkgs.missing".to_string(),
        };
        let report = dispatcher(&registry).get_sources(&request, None).await.unwrap();

        assert!(!report.succeeded());
        assert!(matches!(
            report.errors.last().unwrap(),
            SourceError::SourceNotFound { name } if name == "pkgs.missing"
        ));
    }
}
