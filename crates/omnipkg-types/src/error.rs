use thiserror::Error;

use crate::source::SourceOperation;

/// Errors a single provider invocation can raise.
///
/// `Cancelled` is not a provider failure: the dispatcher propagates it
/// unchanged and never records it against the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider attempted the operation and failed.
    #[error("{0}")]
    Fault(String),

    /// The surrounding operation was cancelled mid-invocation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Errors accumulated over one dispatch call, in provider order.
///
/// A fault from one provider never aborts the dispatch; it is recorded
/// here and the next candidate is tried. The terminal "nothing
/// succeeded" entry, when present, is always last.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A provider's invocation raised a fault.
    #[error("provider '{provider}': {message}")]
    ProviderFault { provider: String, message: String },

    /// The candidate list was exhausted without any provider completing
    /// the operation.
    #[error("no provider completed {operation} for '{name}'")]
    NoProviderSucceeded {
        name: String,
        operation: SourceOperation,
    },

    /// No registered source matched the requested name.
    #[error("no package source found matching '{name}'")]
    SourceNotFound { name: String },
}

/// Errors that abort a dispatch call outright.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The caller cancelled the operation. Never reported as a provider
    /// error.
    #[error("operation cancelled")]
    Cancelled,

    /// The named provider is not registered or lacks the required
    /// capability. Raised during resolution, before any invocation.
    #[error("provider '{name}' not found or does not support {operation}")]
    ProviderNotFound {
        name: String,
        operation: SourceOperation,
    },
}
