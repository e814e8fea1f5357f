//! Preflight check command.

use anyhow::Result;
use notehub_site::SiteChecker;

use super::ConfigSource;

/// Run the check command.
pub fn run(source: &ConfigSource) -> Result<()> {
    tracing::info!("Checking site...");

    let config = source.load()?;
    let report = SiteChecker::new(source.root(), config).check()?;

    tracing::info!(
        "Checked {} pages, {} routes and {} assets in {}ms",
        report.pages,
        report.routes,
        report.assets,
        report.duration_ms
    );

    if report.warnings > 0 {
        tracing::warn!("{} broken link(s) reported as warnings", report.warnings);
    } else {
        tracing::info!("No broken links found");
    }
    if report.code_warnings > 0 {
        tracing::warn!("{} magic comment problem(s) in code blocks", report.code_warnings);
    }

    Ok(())
}
