//! `[[presets]]`: named bundles of docs, blog and theme settings.
//!
//! # Example
//!
//! ```toml
//! [[presets]]
//! name = "classic"
//!
//! [presets.options.docs]
//! sidebar_path = "./sidebars.js"
//!
//! [presets.options.blog]
//! show_reading_time = true
//!
//! [presets.options.theme]
//! custom_css = "./src/css/custom.css"
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigDiagnostics;
use crate::validate;

/// Presets this configuration knows how to validate.
pub const KNOWN_PRESETS: &[&str] = &[Preset::CLASSIC];

/// A named preset with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,

    #[serde(default)]
    pub options: PresetOptions,
}

impl Preset {
    pub const CLASSIC: &'static str = "classic";

    pub fn classic(options: PresetOptions) -> Self {
        Self {
            name: Self::CLASSIC.to_string(),
            options,
        }
    }
}

/// Options for the classic preset. A section left out disables that plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsOptions {
    /// Source directory, relative to the site root
    pub path: String,

    /// URL segment under `base_url`
    pub route_base_path: String,

    /// Sidebar definition file, relative to the site root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_path: Option<String>,

    /// Base URL for "edit this page" links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

impl Default for DocsOptions {
    fn default() -> Self {
        Self {
            path: "docs".to_string(),
            route_base_path: "docs".to_string(),
            sidebar_path: None,
            edit_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogOptions {
    pub path: String,

    pub route_base_path: String,

    pub show_reading_time: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

impl Default for BlogOptions {
    fn default() -> Self {
        Self {
            path: "blog".to_string(),
            route_base_path: "blog".to_string(),
            show_reading_time: false,
            edit_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOptions {
    /// Stylesheets, relative to the site root; a single string is accepted
    #[serde(deserialize_with = "one_or_many")]
    pub custom_css: Vec<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

pub(crate) fn validate_presets(presets: &[Preset], diag: &mut ConfigDiagnostics) {
    let mut seen = HashSet::new();

    for (i, preset) in presets.iter().enumerate() {
        let field = format!("presets[{}]", i);

        if !KNOWN_PRESETS.contains(&preset.name.as_str()) {
            diag.error_with_hint(
                format!("{}.name", field),
                format!("unknown preset '{}'", preset.name),
                format!("known presets: {}", KNOWN_PRESETS.join(", ")),
            );
            continue;
        }
        if !seen.insert(preset.name.as_str()) {
            diag.error(format!("{}.name", field), format!("preset '{}' listed twice", preset.name));
        }

        let options = &preset.options;
        if let Some(docs) = &options.docs {
            let field = format!("{}.options.docs", field);
            validate::non_empty(diag, &format!("{}.path", field), &docs.path);
            route_base_path(diag, &format!("{}.route_base_path", field), &docs.route_base_path);
            if let Some(sidebar) = &docs.sidebar_path {
                validate::non_empty(diag, &format!("{}.sidebar_path", field), sidebar);
            }
            if let Some(edit_url) = &docs.edit_url {
                validate::absolute_url(diag, &format!("{}.edit_url", field), edit_url);
            }
        }
        if let Some(blog) = &options.blog {
            let field = format!("{}.options.blog", field);
            validate::non_empty(diag, &format!("{}.path", field), &blog.path);
            route_base_path(diag, &format!("{}.route_base_path", field), &blog.route_base_path);
            if let Some(edit_url) = &blog.edit_url {
                validate::absolute_url(diag, &format!("{}.edit_url", field), edit_url);
            }
        }
        if let Some(theme) = &options.theme {
            for (c, css) in theme.custom_css.iter().enumerate() {
                let css_field = format!("{}.options.theme.custom_css[{}]", field, c);
                validate::non_empty(diag, &css_field, css);
            }
        }
    }
}

fn route_base_path(diag: &mut ConfigDiagnostics, field: &str, value: &str) {
    if value.starts_with('/') || value.ends_with('/') {
        diag.error_with_hint(
            field,
            format!("'{}' must not start or end with '/'", value),
            "use a bare segment like \"docs\"",
        );
    }
}
