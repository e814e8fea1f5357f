//! Markdown document parser.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::codeblock::CodeBlock;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed Markdown document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Extracted code blocks
    pub code_blocks: Vec<CodeBlock>,

    /// Headings in document order
    pub toc: Vec<TocEntry>,

    /// Outgoing links in document order
    pub links: Vec<Link>,
}

impl ParsedDoc {
    /// Frontmatter title, falling back to the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .or_else(|| {
                self.toc
                    .iter()
                    .find(|e| e.level == 1)
                    .map(|e| e.title.as_str())
            })
    }

    pub fn is_draft(&self) -> bool {
        self.frontmatter.as_ref().is_some_and(|f| f.draft)
    }

    /// Whether the document has a heading with anchor `id`.
    pub fn has_anchor(&self, id: &str) -> bool {
        self.toc.iter().any(|e| e.id == id)
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A link found in the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Destination as written
    pub dest: String,
    /// Line of the link (1-indexed, counting frontmatter)
    pub line: usize,
}

/// Errors that can occur when parsing Markdown.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a Markdown document.
///
/// Extracts frontmatter, code blocks, headings and links.
pub fn parse_markdown(source: &str) -> Result<ParsedDoc, ParseError> {
    // Extract frontmatter first
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut code_blocks = Vec::new();
    let mut toc = Vec::new();
    let mut links = Vec::new();

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    // `content` is a suffix of `source`
    let frontmatter_lines = source[..source.len() - content.len()].matches('\n').count();
    let line_at = |offset: usize| 1 + frontmatter_lines + content[..offset].matches('\n').count();

    let mut current_code_block: Option<(String, usize)> = None; // (info, line)
    let mut code_text = String::new();
    // (level, text, explicit id)
    let mut current_heading: Option<(u8, String, Option<String>)> = None;

    for (event, range) in Parser::new_ext(content, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((info, line_at(range.start)));
                code_text.clear();
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line)) = current_code_block.take() {
                    code_blocks.push(CodeBlock::new(&info, std::mem::take(&mut code_text), line));
                }
            }

            Event::Start(Tag::Heading { level, id, .. }) => {
                current_heading = Some((level as u8, String::new(), id.map(|i| i.to_string())));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text, explicit_id)) = current_heading.take() {
                    let (title, id) = split_heading_id(&text, explicit_id);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                links.push(Link {
                    dest: dest_url.to_string(),
                    line: line_at(range.start),
                });
            }

            Event::Text(text) | Event::Code(text) => {
                if current_code_block.is_some() {
                    code_text.push_str(&text);
                } else if let Some((_, ref mut heading_text, _)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_blocks,
        toc,
        links,
    })
}

/// Split a trailing `{#custom-id}` off heading text, or derive the id.
fn split_heading_id(text: &str, explicit_id: Option<String>) -> (String, String) {
    if let Some(id) = explicit_id {
        return (text.trim().to_string(), id);
    }

    let trimmed = text.trim();
    if let Some(start) = trimmed.rfind("{#") {
        if trimmed.ends_with('}') {
            let id = &trimmed[start + 2..trimmed.len() - 1];
            if !id.is_empty() && !id.contains(char::is_whitespace) {
                return (trimmed[..start].trim_end().to_string(), id.to_string());
            }
        }
    }

    (trimmed.to_string(), slugify(trimmed))
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
