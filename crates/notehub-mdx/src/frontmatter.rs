//! Frontmatter extraction and parsing.

use serde::Deserialize;

/// Parsed frontmatter from a docs page or blog post.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frontmatter {
    /// Page title (falls back to the first heading)
    pub title: Option<String>,

    /// Page description for SEO
    pub description: Option<String>,

    /// Document id, defaults to the file name
    pub id: Option<String>,

    /// Custom route override, absolute (`/intro`) or relative to the parent directory
    pub slug: Option<String>,

    /// Order in the sidebar (lower = first)
    pub sidebar_position: Option<f64>,

    /// Drafts are left out of production builds
    pub draft: bool,

    pub tags: Vec<String>,
}

/// Extract frontmatter from Markdown content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    // Keep the newline after the closing fence so line numbers stay meaningful
    Ok((Some(frontmatter), remaining))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Intro
slug: /intro
sidebar_position: 1
tags: [aws, notes]
---

# Intro
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Intro"));
        assert_eq!(fm.slug.as_deref(), Some("/intro"));
        assert_eq!(fm.sidebar_position, Some(1.0));
        assert_eq!(fm.tags, vec!["aws".to_string(), "notes".to_string()]);
        assert!(!fm.draft);
        assert!(content.trim_start().starts_with("# Intro"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn handles_empty_frontmatter() {
        let (fm, _) = extract_frontmatter("---\n---\n# Title").unwrap();
        assert_eq!(fm, Some(Frontmatter::default()));
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }
}
