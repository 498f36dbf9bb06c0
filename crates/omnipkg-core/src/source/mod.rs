//! Package source provider abstractions.
//!
//! This module defines the core traits and utilities of the dispatch
//! protocol:
//! - `SourceProvider`: RPITIT trait for concrete provider implementations
//! - `BoxSourceProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderRegistry`: ordered, name-indexed provider lookup
//! - `SourceDispatcher`: first-win dispatch across candidate providers

pub mod box_provider;
pub mod dispatch;
pub mod provider;
pub mod registry;
pub mod wildcard;

pub use box_provider::BoxSourceProvider;
pub use dispatch::{DispatchReport, SourceDispatcher};
pub use provider::{SourceOutcome, SourceProvider};
pub use registry::ProviderRegistry;
