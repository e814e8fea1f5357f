//! The site configuration record and its loader.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::copyright::{current_year, render_copyright};
use crate::error::{ConfigDiagnostics, ConfigError};
use crate::preset::{validate_presets, BlogOptions, DocsOptions, Preset, PresetOptions};
use crate::theme::ThemeConfig;
use crate::validate;

/// What to do when the build finds a link to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    /// Say nothing
    Ignore,
    /// Log a warning and keep building
    Warn,
    /// Fail the build
    Throw,
}

/// Locale settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales: vec!["en".to_string()],
        }
    }
}

impl I18nConfig {
    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.locales.is_empty() {
            diag.error("i18n.locales", "at least one locale is required");
        }

        let mut seen = HashSet::new();
        for (i, locale) in self.locales.iter().enumerate() {
            if !validate::is_locale(locale) {
                diag.error_with_hint(
                    format!("i18n.locales[{}]", i),
                    format!("'{}' is not a locale code", locale),
                    "use codes like \"en\" or \"zh-Hans\"",
                );
            }
            if !seen.insert(locale.as_str()) {
                diag.error(format!("i18n.locales[{}]", i), format!("'{}' listed twice", locale));
            }
        }

        if !self.locales.contains(&self.default_locale) {
            diag.error_with_hint(
                "i18n.default_locale",
                format!("'{}' is not one of the configured locales", self.default_locale),
                format!("add \"{}\" to i18n.locales", self.default_locale),
            );
        }
    }
}

/// Site configuration (`notehub.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name
    pub title: String,

    #[serde(default)]
    pub tagline: String,

    /// Favicon, relative to a static directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    /// Production origin, e.g. `https://notes.sreboy.com`
    pub url: String,

    /// Path the site is served under
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deployment organization (usually the GitHub user or org)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,

    /// Deployment project (usually the repository name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default = "default_on_broken_links")]
    pub on_broken_links: BrokenLinkPolicy,

    #[serde(default = "default_warn")]
    pub on_broken_markdown_links: BrokenLinkPolicy,

    #[serde(default = "default_warn")]
    pub on_broken_anchors: BrokenLinkPolicy,

    /// Directories whose files are served from the site root
    #[serde(default = "default_static_directories")]
    pub static_directories: Vec<String>,

    #[serde(default)]
    pub i18n: I18nConfig,

    #[serde(default)]
    pub presets: Vec<Preset>,

    #[serde(default)]
    pub theme_config: ThemeConfig,
}

fn default_base_url() -> String {
    "/".to_string()
}
fn default_on_broken_links() -> BrokenLinkPolicy {
    BrokenLinkPolicy::Throw
}
fn default_warn() -> BrokenLinkPolicy {
    BrokenLinkPolicy::Warn
}
fn default_static_directories() -> Vec<String> {
    vec!["static".to_string()]
}

impl SiteConfig {
    /// A minimal configuration with every optional field at its default.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tagline: String::new(),
            favicon: None,
            url: url.into(),
            base_url: default_base_url(),
            organization_name: None,
            project_name: None,
            on_broken_links: default_on_broken_links(),
            on_broken_markdown_links: default_warn(),
            on_broken_anchors: default_warn(),
            static_directories: default_static_directories(),
            i18n: I18nConfig::default(),
            presets: Vec::new(),
            theme_config: ThemeConfig::default(),
        }
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse, resolve the copyright year and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve_year(current_year());
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON export back into a configuration, resolving the
    /// copyright year and validating it.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(content)?;
        config.resolve_year(current_year());
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Substitute `{year}` in the footer copyright.
    pub fn resolve_year(&mut self, year: i32) {
        if let Some(copyright) = self.theme_config.footer.copyright.as_mut() {
            *copyright = render_copyright(copyright, year);
        }
    }

    /// Check every constraint, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        validate::non_empty(&mut diag, "title", &self.title);

        if let Some(parsed) = validate::absolute_url(&mut diag, "url", &self.url) {
            if !matches!(parsed.path(), "" | "/")
                || parsed.query().is_some()
                || parsed.fragment().is_some()
            {
                diag.error_with_hint(
                    "url",
                    format!("'{}' must be an origin without a path", self.url),
                    "move the path into base_url",
                );
            }
        }

        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            diag.error_with_hint(
                "base_url",
                format!("'{}' must start and end with '/'", self.base_url),
                "use \"/\" or \"/<project>/\"",
            );
        }

        if let Some(favicon) = &self.favicon {
            validate::non_empty(&mut diag, "favicon", favicon);
        }
        if let Some(org) = &self.organization_name {
            validate::identifier(&mut diag, "organization_name", org);
        }
        if let Some(project) = &self.project_name {
            validate::identifier(&mut diag, "project_name", project);
        }

        if self.static_directories.is_empty() {
            diag.error("static_directories", "at least one static directory is required");
        }
        for (i, dir) in self.static_directories.iter().enumerate() {
            validate::non_empty(&mut diag, &format!("static_directories[{}]", i), dir);
        }

        self.i18n.validate(&mut diag);
        validate_presets(&self.presets, &mut diag);
        self.theme_config.validate(&mut diag);

        diag.into_result()
    }

    /// Options of the classic preset, if configured.
    pub fn classic_preset(&self) -> Option<&PresetOptions> {
        self.presets
            .iter()
            .find(|p| p.name == Preset::CLASSIC)
            .map(|p| &p.options)
    }

    pub fn docs_options(&self) -> Option<&DocsOptions> {
        self.classic_preset().and_then(|o| o.docs.as_ref())
    }

    pub fn blog_options(&self) -> Option<&BlogOptions> {
        self.classic_preset().and_then(|o| o.blog.as_ref())
    }

    /// Join `path` onto `base_url` (`/docs/intro` under `/notes/` → `/notes/docs/intro`).
    pub fn route(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
title = "Notes"
url = "https://notes.example.com"
"#;

    fn invalid_fields(config: &SiteConfig) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Invalid(diag)) => diag.iter().map(|d| d.field.clone()).collect(),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = SiteConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config, SiteConfig::new("Notes", "https://notes.example.com"));
        assert_eq!(config.base_url, "/");
        assert_eq!(config.on_broken_links, BrokenLinkPolicy::Throw);
        assert_eq!(config.on_broken_markdown_links, BrokenLinkPolicy::Warn);
        assert_eq!(config.i18n.default_locale, "en");
    }

    #[test]
    fn missing_title_fails_to_parse() {
        let result = SiteConfig::from_toml_str("url = \"https://example.com\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_policy_fails_to_parse() {
        let content = format!("{}on_broken_links = \"explode\"\n", MINIMAL);
        assert!(matches!(
            SiteConfig::from_toml_str(&content),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn base_url_must_be_slashed() {
        let mut config = SiteConfig::new("Notes", "https://notes.example.com");
        config.base_url = "/notes".to_string();
        assert_eq!(invalid_fields(&config), vec!["base_url"]);

        config.base_url = "notes/".to_string();
        assert_eq!(invalid_fields(&config), vec!["base_url"]);

        config.base_url = "/notes/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn url_must_be_an_origin() {
        let mut config = SiteConfig::new("Notes", "https://notes.example.com/docs");
        assert_eq!(invalid_fields(&config), vec!["url"]);

        config.url = "notes.example.com".to_string();
        assert_eq!(invalid_fields(&config), vec!["url"]);

        config.url = "https://notes.example.com/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_locale_must_be_listed() {
        let mut config = SiteConfig::new("Notes", "https://notes.example.com");
        config.i18n = I18nConfig {
            default_locale: "fr".to_string(),
            locales: vec!["en".to_string()],
        };
        assert_eq!(invalid_fields(&config), vec!["i18n.default_locale"]);

        config.i18n.locales.clear();
        let fields = invalid_fields(&config);
        assert!(fields.contains(&"i18n.locales".to_string()));
    }

    #[test]
    fn reports_every_violation() {
        let mut config = SiteConfig::new("", "https://notes.example.com");
        config.base_url = "notes".to_string();
        config.project_name = Some("my project".to_string());

        assert_eq!(invalid_fields(&config), vec!["title", "base_url", "project_name"]);
    }

    #[test]
    fn resolves_copyright_year_on_load() {
        let content = format!(
            "{}[theme_config.footer]\ncopyright = \"Copyright © {{year}} Notes\"\n",
            MINIMAL
        );
        let config = SiteConfig::from_toml_str(&content).unwrap();

        assert_eq!(
            config.theme_config.footer.copyright,
            Some(format!("Copyright © {} Notes", current_year()))
        );
    }

    #[test]
    fn resolves_copyright_year_in_json() {
        let mut template = SiteConfig::new("Notes", "https://notes.example.com");
        template.theme_config.footer.copyright = Some("© {year} Notes".to_string());
        let json = template.to_json_string().unwrap();

        let config = SiteConfig::from_json_str(&json).unwrap();
        assert_eq!(
            config.theme_config.footer.copyright,
            Some(format!("© {} Notes", current_year()))
        );
    }

    #[test]
    fn routes_respect_base_url() {
        let mut config = SiteConfig::new("Notes", "https://notes.example.com");
        assert_eq!(config.route("/blog"), "/blog");

        config.base_url = "/notes/".to_string();
        assert_eq!(config.route("/docs/intro"), "/notes/docs/intro");
        assert_eq!(config.route("docs"), "/notes/docs");
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("notehub.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Notes");

        let missing = SiteConfig::load(&temp.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
