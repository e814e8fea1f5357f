//! Checks that every file the configuration references exists.

use std::fmt;
use std::path::{Path, PathBuf};

use notehub_config::{is_external, SiteConfig};

/// A referenced file that is not on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    /// Config field that references the file
    pub field: String,
    /// Path as written in the config
    pub path: String,
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.path)
    }
}

/// Result of checking referenced assets.
#[derive(Debug, Default)]
pub struct AssetReport {
    /// Number of references checked
    pub checked: usize,
    pub missing: Vec<MissingAsset>,
}

/// Resolves asset references against the site root.
pub struct AssetChecker<'a> {
    root: &'a Path,
    config: &'a SiteConfig,
}

impl<'a> AssetChecker<'a> {
    pub fn new(root: &'a Path, config: &'a SiteConfig) -> Self {
        Self { root, config }
    }

    /// Find a file served from one of the static directories.
    pub fn find_static(&self, path: &str) -> Option<PathBuf> {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }
        self.config
            .static_directories
            .iter()
            .map(|dir| self.root.join(dir).join(relative))
            .find(|candidate| candidate.is_file())
    }

    /// Check every asset reference in the configuration.
    pub fn check(&self) -> AssetReport {
        let mut report = AssetReport::default();

        for dir in &self.config.static_directories {
            if !self.root.join(dir).is_dir() {
                tracing::warn!("Static directory not found: {}", dir);
            }
        }

        let theme = &self.config.theme_config;
        let static_refs = [
            ("favicon", self.config.favicon.as_deref()),
            ("theme_config.image", theme.image.as_deref()),
            (
                "theme_config.navbar.logo.src",
                theme.navbar.logo.as_ref().map(|l| l.src.as_str()),
            ),
        ];
        for (field, path) in static_refs {
            let Some(path) = path else { continue };
            if is_external(path) {
                continue;
            }
            report.checked += 1;
            if self.find_static(path).is_none() {
                report.missing.push(MissingAsset {
                    field: field.to_string(),
                    path: path.to_string(),
                });
            }
        }

        for (i, preset) in self.config.presets.iter().enumerate() {
            let field = format!("presets[{}].options", i);
            let options = &preset.options;

            if let Some(docs) = &options.docs {
                self.require_dir(&mut report, format!("{}.docs.path", field), &docs.path);
                if let Some(sidebar) = &docs.sidebar_path {
                    self.require_file(&mut report, format!("{}.docs.sidebar_path", field), sidebar);
                }
            }
            if let Some(blog) = &options.blog {
                if !self.root.join(&blog.path).is_dir() {
                    tracing::warn!("Blog directory not found: {}", blog.path);
                }
            }
            if let Some(theme) = &options.theme {
                for (c, css) in theme.custom_css.iter().enumerate() {
                    let css_field = format!("{}.theme.custom_css[{}]", field, c);
                    self.require_file(&mut report, css_field, css);
                }
            }
        }

        report
    }

    fn require_file(&self, report: &mut AssetReport, field: String, path: &str) {
        report.checked += 1;
        if !self.root.join(path).is_file() {
            report.missing.push(MissingAsset {
                field,
                path: path.to_string(),
            });
        }
    }

    fn require_dir(&self, report: &mut AssetReport, field: String, path: &str) {
        report.checked += 1;
        if !self.root.join(path).is_dir() {
            report.missing.push(MissingAsset {
                field,
                path: path.to_string(),
            });
        }
    }
}
