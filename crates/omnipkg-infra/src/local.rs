//! Built-in file-backed source provider.
//!
//! Persists source definitions in `sources.json` under the data
//! directory. This provider exists so a fresh install can manage sources
//! without any external provider; ecosystem providers plug into the same
//! `SourceProvider` trait.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use omnipkg_core::source::provider::{SourceOutcome, SourceProvider};
use omnipkg_core::source::wildcard;
use omnipkg_types::error::ProviderError;
use omnipkg_types::source::{
    GetSourceRequest, PackageSourceInfo, ProviderCapabilities, RegisterSourceRequest,
    SetSourceRequest, UnregisterSourceRequest,
};

/// Name this provider registers under.
pub const PROVIDER_NAME: &str = "local";

/// On-disk representation of one source entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSource {
    name: String,
    location: String,
    trusted: bool,
}

/// Source provider backed by a JSON file.
///
/// Declines mutating requests for source names it does not manage, so a
/// dispatch can fall through to other registered providers.
pub struct LocalSourceProvider {
    store_path: PathBuf,
    capabilities: ProviderCapabilities,
}

impl LocalSourceProvider {
    /// Create a provider storing sources in `{data_dir}/sources.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            store_path: data_dir.join("sources.json"),
            capabilities: ProviderCapabilities::all(),
        }
    }

    /// Load stored sources. A missing file is an empty store.
    async fn load(&self) -> Result<Vec<StoredSource>, ProviderError> {
        let content = match tokio::fs::read_to_string(&self.store_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ProviderError::Fault(format!(
                    "failed to read {}: {err}",
                    self.store_path.display()
                )));
            }
        };

        serde_json::from_str(&content).map_err(|err| {
            ProviderError::Fault(format!(
                "failed to parse {}: {err}",
                self.store_path.display()
            ))
        })
    }

    async fn save(&self, sources: &[StoredSource]) -> Result<(), ProviderError> {
        let content = serde_json::to_string_pretty(sources)
            .map_err(|err| ProviderError::Fault(format!("failed to serialize sources: {err}")))?;
        tokio::fs::write(&self.store_path, content)
            .await
            .map_err(|err| {
                ProviderError::Fault(format!(
                    "failed to write {}: {err}",
                    self.store_path.display()
                ))
            })
    }

    fn to_info(&self, source: &StoredSource) -> PackageSourceInfo {
        PackageSourceInfo {
            name: source.name.clone(),
            location: source.location.clone(),
            provider: PROVIDER_NAME.to_string(),
            trusted: source.trusted,
        }
    }
}

impl SourceProvider for LocalSourceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn get_sources(
        &self,
        request: &GetSourceRequest,
    ) -> Result<Vec<PackageSourceInfo>, ProviderError> {
        let sources = self.load().await?;
        Ok(sources
            .iter()
            .filter(|s| wildcard::matches(&request.name, &s.name))
            .map(|s| self.to_info(s))
            .collect())
    }

    async fn set_source(
        &self,
        request: &SetSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        let mut sources = self.load().await?;

        let Some(source) = sources
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(&request.name))
        else {
            // Not a source this provider manages.
            return Ok(SourceOutcome::Declined);
        };

        // Tri-state: None leaves the stored value; Some("") is a valid
        // explicit empty location.
        if let Some(location) = &request.location {
            source.location = location.clone();
        }
        if let Some(trusted) = request.trusted {
            source.trusted = trusted;
        }

        let info = self.to_info(source);
        self.save(&sources).await?;
        Ok(SourceOutcome::Completed(info))
    }

    async fn register_source(
        &self,
        request: &RegisterSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        let mut sources = self.load().await?;

        let existing = sources
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(&request.name));
        if existing.is_some() && !request.force {
            return Err(ProviderError::Fault(format!(
                "source '{}' already exists (use force to replace)",
                request.name
            )));
        }

        let source = StoredSource {
            name: request.name.clone(),
            location: request.location.clone(),
            trusted: request.trusted.unwrap_or(false),
        };
        let info = self.to_info(&source);

        match existing {
            Some(idx) => sources[idx] = source,
            None => sources.push(source),
        }

        self.save(&sources).await?;
        Ok(SourceOutcome::Completed(info))
    }

    async fn unregister_source(
        &self,
        request: &UnregisterSourceRequest,
    ) -> Result<SourceOutcome, ProviderError> {
        let mut sources = self.load().await?;

        let Some(idx) = sources
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(&request.name))
        else {
            return Ok(SourceOutcome::Declined);
        };

        let removed = sources.remove(idx);
        let info = self.to_info(&removed);
        self.save(&sources).await?;
        Ok(SourceOutcome::Completed(info))
    }
}
