//! Code block extraction and parsing.

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Unique identifier for this block (format: block-{line_number})
    pub id: String,

    /// Language from the info string (`rust`, `py`, ...)
    pub language: Option<String>,

    /// Everything in the info string after the language
    pub metastring: String,

    /// Source code content
    pub source: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,

    /// Optional title from the info string
    pub title: Option<String>,
}

impl CodeBlock {
    /// Create a code block from a fence info string.
    pub fn new(info: &str, source: String, line_number: usize) -> Self {
        let info = info.trim();
        let (language, metastring) = match info.split_once(char::is_whitespace) {
            Some((lang, rest)) => (lang, rest.trim()),
            None => (info, ""),
        };

        Self {
            id: format!("block-{}", line_number),
            language: (!language.is_empty()).then(|| language.to_lowercase()),
            metastring: metastring.to_string(),
            title: extract_title(metastring),
            source,
            line_number,
        }
    }
}

/// Extract a title from a code fence metastring if present.
///
/// Supports formats like:
/// - `title="main.py"`
/// - `title=main.py`
pub fn extract_title(meta: &str) -> Option<String> {
    // Try title="..." format
    if let Some(start) = meta.find("title=\"") {
        let rest = &meta[start + 7..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    // Try title=... format (without quotes)
    if let Some(start) = meta.find("title=") {
        let rest = &meta[start + 6..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let title = rest[..end].trim_matches('"');
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    None
}
