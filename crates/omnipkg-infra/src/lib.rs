//! Infrastructure implementations for omnipkg.
//!
//! Concrete pieces the core stays agnostic of: the built-in file-backed
//! source provider, data directory resolution, and global config loading.

pub mod config;
pub mod local;
pub mod paths;
