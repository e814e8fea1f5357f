//! Initialize a notes hub site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use notehub_config::SiteConfig;

use super::ConfigSource;

/// Run the init command.
pub fn run(source: &ConfigSource, yes: bool) -> Result<()> {
    tracing::info!("Initializing notehub...");

    let root = source.root();

    if source.path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            source.path.display()
        );
        return Ok(());
    }

    let config = format!(
        "{}{}",
        CONFIG_HEADER,
        SiteConfig::notes_hub_template().to_toml_string()?
    );
    fs::write(&source.path, config)
        .with_context(|| format!("Failed to write {}", source.path.display()))?;
    tracing::info!("Created {}", source.path.display());

    let files = [
        ("docs/intro.md", DEFAULT_INTRO),
        ("blog/2024-01-01-welcome.md", DEFAULT_POST),
        ("sidebars.js", DEFAULT_SIDEBARS),
        ("src/css/custom.css", DEFAULT_CSS),
        ("static/img/logo.svg", DEFAULT_LOGO),
    ];
    for (path, content) in files {
        write_file(&root, path, content, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!(
        "Add static/img/favicon.ico and static/img/sre-boy-logo.jpeg, then run 'notehub check'."
    );

    Ok(())
}

fn write_file(root: &Path, relative: &str, content: &str, overwrite: bool) -> Result<()> {
    let path = root.join(relative);
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", relative);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", relative))?;
    tracing::info!("Created {}", relative);

    Ok(())
}

const CONFIG_HEADER: &str = r#"# notehub configuration
#
# `{year}` in theme_config.footer.copyright is replaced with the current year.
# Link policies: "ignore", "warn" or "throw".

"#;

const DEFAULT_INTRO: &str = r#"---
sidebar_position: 1
---

# Notes Hub

Welcome! These notes are reachable from anywhere.

## Getting Started

Add Markdown files under `docs/` and they show up in the sidebar.
Link between notes with relative paths, e.g. `[S3](./aws/s3.md)`.

```python title="hello.py"
# highlight-next-line
print("hello from the notes hub")
```
"#;

const DEFAULT_POST: &str = r#"---
title: Welcome
tags: [meta]
---

The blog lives next to the [notes](/docs/intro).
"#;

const DEFAULT_SIDEBARS: &str = r#"// @ts-check

/** @type {import('@docusaurus/plugin-content-docs').SidebarsConfig} */
const sidebars = {
  tutorialSidebar: [{type: 'autogenerated', dirName: '.'}],
};

export default sidebars;
"#;

const DEFAULT_CSS: &str = r#":root {
  --ifm-color-primary: #2e8555;
  --ifm-code-font-size: 95%;
}

.code-block-error-line {
  background-color: #ff000020;
  display: block;
  margin: 0 calc(-1 * var(--ifm-pre-padding));
  padding: 0 var(--ifm-pre-padding);
  border-left: 3px solid #ff000080;
}
"#;

const DEFAULT_LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32">
  <rect width="32" height="32" rx="6" fill="#2e8555"/>
</svg>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_site::{CheckError, SiteChecker};
    use tempfile::tempdir;

    #[test]
    fn init_writes_a_loadable_site() {
        let temp = tempdir().unwrap();
        let source = ConfigSource {
            path: temp.path().join("notehub.toml"),
            builtin: false,
        };

        run(&source, false).unwrap();

        let config = source.load().unwrap();
        assert_eq!(config, SiteConfig::notes_hub());

        // Only the binary images are left for the user to add
        let err = SiteChecker::new(source.root(), config.clone()).check().unwrap_err();
        match err {
            CheckError::MissingAssets(missing) => {
                let fields: Vec<_> = missing.iter().map(|m| m.field.as_str()).collect();
                assert_eq!(fields, vec!["favicon", "theme_config.image"]);
            }
            other => panic!("expected missing assets, got {:?}", other),
        }

        fs::write(temp.path().join("static/img/favicon.ico"), "").unwrap();
        fs::write(temp.path().join("static/img/sre-boy-logo.jpeg"), "").unwrap();
        let report = SiteChecker::new(source.root(), config).check().unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.warnings, 0);
        assert_eq!(report.code_warnings, 0);
    }

    #[test]
    fn init_keeps_existing_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("notehub.toml");
        fs::write(&path, "# mine").unwrap();

        let source = ConfigSource {
            path: path.clone(),
            builtin: false,
        };
        run(&source, false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");
    }
}
