//! Global configuration types for omnipkg.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. All fields have sensible defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration for omnipkg.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Provider filter applied when the user does not pass `--provider`.
    /// May contain wildcards.
    #[serde(default)]
    pub default_provider: Option<String>,
}
