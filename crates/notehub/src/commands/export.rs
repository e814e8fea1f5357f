//! Export the resolved configuration for the build tool.

use std::path::PathBuf;

use anyhow::Result;
use notehub_site::{export_config, SiteChecker, DEFAULT_EXPORT_PATH};

use super::ConfigSource;

/// Run the export command.
pub fn run(source: &ConfigSource, output: Option<PathBuf>, check: bool) -> Result<()> {
    let config = source.load()?;
    let root = source.root();

    if check {
        let report = SiteChecker::new(&root, config.clone()).check()?;
        tracing::info!(
            "Preflight passed ({} pages, {} warnings)",
            report.pages,
            report.warnings
        );
    }

    let output = output.unwrap_or_else(|| root.join(DEFAULT_EXPORT_PATH));
    export_config(&config, &output)?;

    Ok(())
}
