//! Data directory resolution.

use std::path::PathBuf;

/// Resolve the omnipkg data directory.
///
/// Precedence: `OMNIPKG_DATA_DIR` env override, then `~/.omnipkg`, then
/// `./.omnipkg` as a last resort.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OMNIPKG_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".omnipkg");
    }

    PathBuf::from(".omnipkg")
}
