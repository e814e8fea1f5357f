//! Hand the resolved configuration to the build tool as JSON.

use std::fs;
use std::path::Path;

use notehub_config::SiteConfig;

use crate::checker::CheckError;

/// Default export location, relative to the site root.
pub const DEFAULT_EXPORT_PATH: &str = "build/notehub.config.json";

/// Write `config` as pretty-printed JSON to `path`, creating parent directories.
pub fn export_config(config: &SiteConfig, path: &Path) -> Result<(), CheckError> {
    let json = config.to_json_string()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CheckError::WriteError(e.to_string()))?;
    }
    fs::write(path, json).map_err(|e| CheckError::WriteError(e.to_string()))?;

    tracing::info!("Exported config to {}", path.display());
    Ok(())
}
