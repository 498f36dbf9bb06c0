//! Application state wiring the provider registry and configuration.
//!
//! The CLI pins the registry to the built-in providers; ecosystem
//! providers register here as they are added.

use std::path::PathBuf;

use anyhow::Context;

use omnipkg_core::source::{BoxSourceProvider, ProviderRegistry};
use omnipkg_infra::config::load_global_config;
use omnipkg_infra::local::LocalSourceProvider;
use omnipkg_infra::paths::resolve_data_dir;
use omnipkg_types::config::GlobalConfig;

/// Shared application state for CLI commands.
pub struct AppState {
    pub registry: ProviderRegistry,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: resolve the data directory,
    /// load configuration, and register the built-in providers.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let mut registry = ProviderRegistry::new();
        registry.register(BoxSourceProvider::new(LocalSourceProvider::new(&data_dir)));

        Ok(Self {
            registry,
            config,
            data_dir,
        })
    }

    /// Provider filter for a dispatch: the explicit `--provider` value,
    /// falling back to the configured default.
    pub fn provider_filter(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.config.default_provider.clone())
    }
}
