//! Shared domain types for omnipkg.
//!
//! This crate contains the core domain types used across omnipkg:
//! package source records, operation requests, provider capabilities,
//! and the error taxonomy of the dispatch protocol.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod source;
