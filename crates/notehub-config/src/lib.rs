//! Site configuration for the notehub documentation site.
//!
//! One [`SiteConfig`] value describes the whole site: metadata, link policies,
//! locales, presets and theme. It is either loaded from `notehub.toml` or built
//! from literals with [`SiteConfig::notes_hub`], validated once, and read-only
//! afterwards.

pub mod builtin;
pub mod copyright;
pub mod error;
pub mod preset;
pub mod site;
pub mod theme;
pub mod validate;

pub use copyright::{current_year, render_copyright, YEAR_PLACEHOLDER};
pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use preset::{BlogOptions, DocsOptions, Preset, PresetOptions, ThemeOptions, KNOWN_PRESETS};
pub use site::{BrokenLinkPolicy, I18nConfig, SiteConfig};
pub use theme::{
    BlockMarkers, Footer, FooterColumn, FooterLink, FooterStyle, LinkTarget, Logo,
    MagicCommentRule, Navbar, NavbarItem, Position, PrismConfig, PrismTheme, ThemeConfig,
};
pub use validate::is_external;

/// Default config file name, looked up in the site root.
pub const CONFIG_FILE: &str = "notehub.toml";
