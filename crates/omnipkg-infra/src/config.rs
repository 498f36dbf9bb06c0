//! Global configuration loader for omnipkg.
//!
//! Reads `config.toml` from the data directory (`~/.omnipkg/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use omnipkg_types::config::GlobalConfig;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = load_global_config(dir.path()).await;
        assert!(config.default_provider.is_none());
    }

    #[tokio::test]
    async fn test_parses_default_provider() {
        let dir = tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("config.toml"),
            "default_provider = \"local\"\n",
        )
        .await
        .unwrap();

        let config = load_global_config(dir.path()).await;
        assert_eq!(config.default_provider.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn test_malformed_file_returns_defaults() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("config.toml"), "default_provider = [")
            .await
            .unwrap();

        let config = load_global_config(dir.path()).await;
        assert!(config.default_provider.is_none());
    }
}
