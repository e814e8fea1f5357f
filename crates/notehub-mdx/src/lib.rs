//! Markdown inspection for notehub sources.
//!
//! This crate parses docs pages and blog posts far enough to check a site
//! before it is built: frontmatter, headings (anchor ids), outgoing links and
//! code blocks. [`MagicComments`] applies the configured highlight markers to
//! code samples.

pub mod codeblock;
pub mod frontmatter;
pub mod magic;
pub mod parser;

pub use codeblock::CodeBlock;
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use magic::{
    parse_line_ranges, HighlightedCode, LineRanges, MagicCommentIssue, MagicComments,
};
pub use parser::{parse_markdown, slugify, Link, ParseError, ParsedDoc, TocEntry};
