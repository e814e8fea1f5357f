//! `[theme_config]`: navbar, footer, code highlighting and the social card.
//!
//! # Example
//!
//! ```toml
//! [theme_config]
//! image = "img/social-card.jpeg"
//!
//! [theme_config.navbar]
//! title = "My Site"
//! logo = { alt = "My Site Logo", src = "img/logo.svg" }
//!
//! [[theme_config.navbar.items]]
//! type = "doc_sidebar"
//! sidebar_id = "tutorialSidebar"
//! label = "Notes"
//!
//! [[theme_config.navbar.items]]
//! type = "link"
//! href = "https://github.com/facebook/docusaurus"
//! label = "GitHub"
//! position = "right"
//!
//! [theme_config.prism]
//! theme = "github"
//! dark_theme = "dracula"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigDiagnostics;
use crate::validate;

/// Theme configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Social card image, relative to a static directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub navbar: Navbar,

    pub footer: Footer,

    pub prism: PrismConfig,
}

impl ThemeConfig {
    pub(crate) fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(image) = &self.image {
            validate::non_empty(diag, "theme_config.image", image);
        }
        self.navbar.validate(diag);
        self.footer.validate(diag);
        self.prism.validate(diag);
    }
}

// ============================================================================
// Navbar
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navbar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,

    pub items: Vec<NavbarItem>,
}

/// Navbar logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    /// Alt text
    pub alt: String,

    /// Image path, relative to a static directory
    pub src: String,

    /// Where clicking the logo leads (defaults to the site root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Horizontal placement of a navbar item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

/// A navbar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavbarItem {
    /// Points at a generated sidebar rather than a fixed URL.
    DocSidebar {
        sidebar_id: String,
        label: String,
        #[serde(default)]
        position: Position,
    },

    /// A direct link, either internal (`to`) or external (`href`).
    Link {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        label: String,
        #[serde(default)]
        position: Position,
    },
}

impl NavbarItem {
    pub fn label(&self) -> &str {
        match self {
            Self::DocSidebar { label, .. } | Self::Link { label, .. } => label,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::DocSidebar { position, .. } | Self::Link { position, .. } => *position,
        }
    }

    /// Link target, or `None` for sidebar references and malformed links.
    pub fn target(&self) -> Option<LinkTarget<'_>> {
        match self {
            Self::DocSidebar { .. } => None,
            Self::Link { to, href, .. } => LinkTarget::from_pair(to, href),
        }
    }
}

impl Navbar {
    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(logo) = &self.logo {
            validate::non_empty(diag, "theme_config.navbar.logo.src", &logo.src);
        }

        for (i, item) in self.items.iter().enumerate() {
            let field = format!("theme_config.navbar.items[{}]", i);
            validate::non_empty(diag, &format!("{}.label", field), item.label());

            match item {
                NavbarItem::DocSidebar { sidebar_id, .. } => {
                    validate::non_empty(diag, &format!("{}.sidebar_id", field), sidebar_id);
                }
                NavbarItem::Link { to, href, .. } => {
                    validate_target(diag, &field, to, href);
                }
            }
        }
    }
}

// ============================================================================
// Links
// ============================================================================

/// Where a link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Root-relative site path (`to`)
    Internal(&'a str),
    /// Absolute URL (`href`)
    External(&'a str),
}

impl<'a> LinkTarget<'a> {
    fn from_pair(to: &'a Option<String>, href: &'a Option<String>) -> Option<Self> {
        match (to.as_deref(), href.as_deref()) {
            (Some(to), None) => Some(Self::Internal(to)),
            (None, Some(href)) => Some(Self::External(href)),
            _ => None,
        }
    }
}

fn validate_target(
    diag: &mut ConfigDiagnostics,
    field: &str,
    to: &Option<String>,
    href: &Option<String>,
) {
    match (to, href) {
        (Some(to), None) => {
            if validate::non_empty(diag, &format!("{}.to", field), to) {
                validate::internal_path(diag, &format!("{}.to", field), to);
            }
        }
        (None, Some(href)) => {
            if validate::non_empty(diag, &format!("{}.href", field), href) {
                validate::absolute_url(diag, &format!("{}.href", field), href);
            }
        }
        (Some(_), Some(_)) => {
            diag.error_with_hint(field, "both `to` and `href` are set", "keep exactly one");
        }
        (None, None) => {
            diag.error_with_hint(
                field,
                "link has no target",
                "set `to` for site pages or `href` for external URLs",
            );
        }
    }
}

// ============================================================================
// Footer
// ============================================================================

/// Footer color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub style: FooterStyle,

    /// Link columns, rendered left to right
    pub links: Vec<FooterColumn>,

    /// Copyright line; `{year}` is replaced with the current year on load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// A titled group of footer links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub items: Vec<FooterLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl FooterLink {
    pub fn target(&self) -> Option<LinkTarget<'_>> {
        LinkTarget::from_pair(&self.to, &self.href)
    }
}

impl Footer {
    fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (c, column) in self.links.iter().enumerate() {
            for (i, link) in column.items.iter().enumerate() {
                let field = format!("theme_config.footer.links[{}].items[{}]", c, i);
                validate::non_empty(diag, &format!("{}.label", field), &link.label);
                validate_target(diag, &field, &link.to, &link.href);
            }
        }
    }
}

// ============================================================================
// Prism
// ============================================================================

/// Syntax highlighting themes shipped with the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrismTheme {
    Dracula,
    DuotoneDark,
    DuotoneLight,
    Github,
    GruvboxMaterialDark,
    GruvboxMaterialLight,
    JettwaveDark,
    JettwaveLight,
    NightOwl,
    NightOwlLight,
    OceanicNext,
    Okaidia,
    OneDark,
    OneLight,
    Palenight,
    ShadesOfPurple,
    Synthwave84,
    Ultramin,
    VsDark,
    VsLight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismConfig {
    pub theme: PrismTheme,

    pub dark_theme: PrismTheme,

    /// Extra languages to load beyond the highlighter's defaults
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_languages: Vec<String>,

    /// Marker-based line highlighting rules; empty means the default rule
    pub magic_comments: Vec<MagicCommentRule>,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            theme: PrismTheme::Github,
            dark_theme: PrismTheme::Dracula,
            additional_languages: Vec::new(),
            magic_comments: Vec::new(),
        }
    }
}

impl PrismConfig {
    /// Rules in effect, falling back to the default highlight rule.
    pub fn effective_magic_comments(&self) -> Vec<MagicCommentRule> {
        if self.magic_comments.is_empty() {
            vec![MagicCommentRule::default_highlight()]
        } else {
            self.magic_comments.clone()
        }
    }

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (i, lang) in self.additional_languages.iter().enumerate() {
            let field = format!("theme_config.prism.additional_languages[{}]", i);
            validate::non_empty(diag, &field, lang);
        }

        for (i, rule) in self.magic_comments.iter().enumerate() {
            let field = format!("theme_config.prism.magic_comments[{}]", i);
            validate::non_empty(diag, &format!("{}.class_name", field), &rule.class_name);
            validate::non_empty(diag, &format!("{}.line", field), &rule.line);

            if let Some(block) = &rule.block {
                validate::non_empty(diag, &format!("{}.block.start", field), &block.start);
                validate::non_empty(diag, &format!("{}.block.end", field), &block.end);
                if block.start == block.end {
                    diag.error(
                        format!("{}.block", field),
                        "block start and end markers must differ",
                    );
                }
            }
        }
    }
}

/// Marker comments that highlight lines inside code samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicCommentRule {
    /// CSS class applied to highlighted lines
    pub class_name: String,

    /// Marker that highlights the line after it
    pub line: String,

    /// Markers that highlight every line between them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockMarkers>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMarkers {
    pub start: String,
    pub end: String,
}

impl MagicCommentRule {
    pub const DEFAULT_CLASS_NAME: &'static str = "theme-code-block-highlighted-line";

    /// The highlighter's built-in rule.
    pub fn default_highlight() -> Self {
        Self {
            class_name: Self::DEFAULT_CLASS_NAME.to_string(),
            line: "highlight-next-line".to_string(),
            block: Some(BlockMarkers {
                start: "highlight-start".to_string(),
                end: "highlight-end".to_string(),
            }),
        }
    }
}
