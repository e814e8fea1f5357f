//! The notes hub site, built from literals.

use crate::copyright::{current_year, render_copyright};
use crate::preset::{BlogOptions, DocsOptions, Preset, PresetOptions, ThemeOptions};
use crate::site::{BrokenLinkPolicy, I18nConfig, SiteConfig};
use crate::theme::{
    BlockMarkers, Footer, FooterColumn, FooterLink, FooterStyle, Logo, MagicCommentRule, Navbar,
    NavbarItem, Position, PrismConfig, PrismTheme, ThemeConfig,
};

const EDIT_URL: &str =
    "https://github.com/facebook/docusaurus/tree/main/packages/create-docusaurus/templates/shared/";

/// Copyright line before year substitution.
pub const NOTES_HUB_COPYRIGHT: &str = "Copyright © {year} SREboy.com";

fn internal(label: &str, to: &str) -> FooterLink {
    FooterLink {
        label: label.to_string(),
        to: Some(to.to_string()),
        href: None,
    }
}

fn external(label: &str, href: &str) -> FooterLink {
    FooterLink {
        label: label.to_string(),
        to: None,
        href: Some(href.to_string()),
    }
}

impl SiteConfig {
    /// The notes hub configuration with the copyright year set to now.
    pub fn notes_hub() -> Self {
        let mut config = Self::notes_hub_template();
        config.resolve_year(current_year());
        config
    }

    /// The notes hub configuration with `{year}` still unresolved.
    pub fn notes_hub_template() -> Self {
        Self {
            title: "Ziad Hassanin".to_string(),
            tagline: "This is my notes hub to access it from anywhere".to_string(),
            favicon: Some("img/favicon.ico".to_string()),
            url: "https://notes.sreboy.com".to_string(),
            base_url: "/".to_string(),
            organization_name: Some("facebook".to_string()),
            project_name: Some("docusaurus".to_string()),
            on_broken_links: BrokenLinkPolicy::Throw,
            on_broken_markdown_links: BrokenLinkPolicy::Warn,
            on_broken_anchors: BrokenLinkPolicy::Warn,
            static_directories: vec!["static".to_string()],
            i18n: I18nConfig {
                default_locale: "en".to_string(),
                locales: vec!["en".to_string()],
            },
            presets: vec![Preset::classic(PresetOptions {
                docs: Some(DocsOptions {
                    sidebar_path: Some("./sidebars.js".to_string()),
                    edit_url: Some(EDIT_URL.to_string()),
                    ..Default::default()
                }),
                blog: Some(BlogOptions {
                    show_reading_time: true,
                    edit_url: Some(EDIT_URL.to_string()),
                    ..Default::default()
                }),
                theme: Some(ThemeOptions {
                    custom_css: vec!["./src/css/custom.css".to_string()],
                }),
            })],
            theme_config: ThemeConfig {
                image: Some("img/sre-boy-logo.jpeg".to_string()),
                navbar: Navbar {
                    title: Some("My Site".to_string()),
                    logo: Some(Logo {
                        alt: "My Site Logo".to_string(),
                        src: "img/logo.svg".to_string(),
                        href: None,
                    }),
                    items: vec![
                        NavbarItem::DocSidebar {
                            sidebar_id: "tutorialSidebar".to_string(),
                            label: "Notes".to_string(),
                            position: Position::Left,
                        },
                        NavbarItem::Link {
                            to: Some("/blog".to_string()),
                            href: None,
                            label: "Blog".to_string(),
                            position: Position::Left,
                        },
                        NavbarItem::Link {
                            to: None,
                            href: Some("https://github.com/facebook/docusaurus".to_string()),
                            label: "GitHub".to_string(),
                            position: Position::Right,
                        },
                    ],
                },
                footer: Footer {
                    style: FooterStyle::Dark,
                    links: vec![
                        FooterColumn {
                            title: Some("Navigate".to_string()),
                            items: vec![
                                internal("Notes Hub", "/docs/intro"),
                                internal("My Blog", "/blog"),
                            ],
                        },
                        FooterColumn {
                            title: Some("Community".to_string()),
                            items: vec![
                                external("Github Account", "https://github.com/ZiadMansourM/"),
                                external(
                                    "LinkedIn Account",
                                    "https://www.linkedin.com/in/ziad-mansour/",
                                ),
                                external("Twitter", "https://twitter.com/theSREboy"),
                            ],
                        },
                        FooterColumn {
                            title: Some("More".to_string()),
                            items: vec![
                                external("WhatsApp", "https://wa.me/201021799950"),
                                external("Instagram", "https://www.instagram.com/ziad_m_404/"),
                                external(
                                    "Spotify",
                                    "https://open.spotify.com/user/31ddrkim3dwxgl7y53xtlse67y6u",
                                ),
                            ],
                        },
                    ],
                    copyright: Some(NOTES_HUB_COPYRIGHT.to_string()),
                },
                prism: PrismConfig {
                    theme: PrismTheme::Github,
                    dark_theme: PrismTheme::Dracula,
                    additional_languages: Vec::new(),
                    magic_comments: vec![
                        MagicCommentRule {
                            class_name: MagicCommentRule::DEFAULT_CLASS_NAME.to_string(),
                            line: "highlight-next-line".to_string(),
                            block: Some(BlockMarkers {
                                start: "highlight-start".to_string(),
                                end: "highlight-end".to_string(),
                            }),
                        },
                        MagicCommentRule {
                            class_name: "code-block-error-line".to_string(),
                            line: "This will error".to_string(),
                            block: None,
                        },
                    ],
                },
            },
        }
    }

    /// The resolved copyright line for `year`.
    pub fn notes_hub_copyright(year: i32) -> String {
        render_copyright(NOTES_HUB_COPYRIGHT, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::LinkTarget;
    use pretty_assertions::assert_eq;

    #[test]
    fn notes_hub_is_valid() {
        SiteConfig::notes_hub().validate().unwrap();
    }

    #[test]
    fn default_locale_is_listed() {
        let config = SiteConfig::notes_hub();
        assert!(config.i18n.locales.contains(&config.i18n.default_locale));
    }

    #[test]
    fn base_url_is_slashed() {
        let config = SiteConfig::notes_hub();
        assert!(config.base_url.starts_with('/'));
        assert!(config.base_url.ends_with('/'));
    }

    #[test]
    fn copyright_uses_current_year() {
        let config = SiteConfig::notes_hub();
        let year = current_year();

        assert_eq!(
            config.theme_config.footer.copyright.as_deref(),
            Some(format!("Copyright © {} SREboy.com", year).as_str())
        );
        assert_eq!(
            config.theme_config.footer.copyright,
            Some(SiteConfig::notes_hub_copyright(year))
        );
    }

    #[test]
    fn navbar_items_are_labelled() {
        let config = SiteConfig::notes_hub();
        for item in &config.theme_config.navbar.items {
            assert!(!item.label().is_empty());
            assert!(matches!(
                item,
                NavbarItem::DocSidebar { .. } | NavbarItem::Link { .. }
            ));
        }
    }

    #[test]
    fn footer_links_have_targets() {
        let config = SiteConfig::notes_hub();
        for column in &config.theme_config.footer.links {
            for link in &column.items {
                assert!(!link.label.is_empty());
                match link.target() {
                    Some(LinkTarget::Internal(to)) => assert!(!to.is_empty()),
                    Some(LinkTarget::External(href)) => assert!(!href.is_empty()),
                    None => panic!("footer link '{}' has no target", link.label),
                }
            }
        }
    }

    #[test]
    fn link_policies() {
        let config = SiteConfig::notes_hub();
        assert_eq!(config.on_broken_links, BrokenLinkPolicy::Throw);
        assert_eq!(config.on_broken_markdown_links, BrokenLinkPolicy::Warn);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = SiteConfig::notes_hub();
        let toml = config.to_toml_string().unwrap();
        let parsed = SiteConfig::from_toml_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn round_trips_through_json() {
        let config = SiteConfig::notes_hub();
        let json = config.to_json_string().unwrap();
        let parsed = SiteConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn template_keeps_placeholder() {
        let template = SiteConfig::notes_hub_template();
        assert_eq!(
            template.theme_config.footer.copyright.as_deref(),
            Some(NOTES_HUB_COPYRIGHT)
        );
    }
}
