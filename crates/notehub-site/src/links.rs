//! Broken link reporting and policy enforcement.

use std::fmt;

use notehub_config::{BrokenLinkPolicy, SiteConfig};

/// Which policy a broken link falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BrokenKind {
    /// Site route that does not exist (`on_broken_links`)
    Link,
    /// Relative Markdown file that does not exist (`on_broken_markdown_links`)
    MarkdownLink,
    /// Heading anchor that does not exist (`on_broken_anchors`)
    Anchor,
}

impl BrokenKind {
    pub fn policy(self, config: &SiteConfig) -> BrokenLinkPolicy {
        match self {
            Self::Link => config.on_broken_links,
            Self::MarkdownLink => config.on_broken_markdown_links,
            Self::Anchor => config.on_broken_anchors,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Link => "broken link",
            Self::MarkdownLink => "broken Markdown link",
            Self::Anchor => "broken anchor",
        }
    }
}

/// A link whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrokenLink {
    pub kind: BrokenKind,
    /// Where the link lives (`docs/intro.md:12`, `theme_config.navbar.items[1]`)
    pub source: String,
    /// The target as written
    pub target: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Outcome of applying the link policies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Broken links logged as warnings
    pub warned: usize,
    /// Broken links silently dropped
    pub ignored: usize,
    /// Broken links that must fail the build
    pub fatal: Vec<BrokenLink>,
}

/// Apply each kind's policy. Warnings are logged here; fatal links are returned.
pub fn apply_policies(config: &SiteConfig, mut broken: Vec<BrokenLink>) -> PolicyOutcome {
    broken.sort();
    broken.dedup();

    let mut outcome = PolicyOutcome::default();
    for link in broken {
        match link.kind.policy(config) {
            BrokenLinkPolicy::Ignore => outcome.ignored += 1,
            BrokenLinkPolicy::Warn => {
                tracing::warn!("{}: {}", link.kind.describe(), link);
                outcome.warned += 1;
            }
            BrokenLinkPolicy::Throw => outcome.fatal.push(link),
        }
    }
    outcome
}

/// Render fatal links for an error message.
pub fn format_links(links: &[BrokenLink]) -> String {
    links
        .iter()
        .map(|l| format!("  - {}: {}", l.kind.describe(), l))
        .collect::<Vec<_>>()
        .join("\n")
}
