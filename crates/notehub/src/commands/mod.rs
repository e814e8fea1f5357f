//! CLI subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notehub_config::SiteConfig;

pub mod check;
pub mod export;
pub mod init;
pub mod show;

/// Where the configuration comes from.
pub struct ConfigSource {
    /// Path to the config file
    pub path: PathBuf,

    /// Use the built-in notes hub configuration instead
    pub builtin: bool,
}

impl ConfigSource {
    /// Load and validate the configuration.
    pub fn load(&self) -> Result<SiteConfig> {
        if self.builtin {
            tracing::debug!("Using built-in notes hub configuration");
            let config = SiteConfig::notes_hub();
            config
                .validate()
                .context("Built-in configuration is invalid")?;
            return Ok(config);
        }

        SiteConfig::load(&self.path)
            .with_context(|| format!("Failed to load {}", self.path.display()))
    }

    /// The site root: the directory holding the config file.
    pub fn root(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        }
    }
}
