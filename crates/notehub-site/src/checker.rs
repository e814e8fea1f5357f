//! Site preflight: everything the build tool would reject, found up front.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use notehub_config::{is_external, LinkTarget, SiteConfig};
use notehub_mdx::{parse_markdown, MagicCommentIssue, MagicComments, ParsedDoc};

use crate::assets::{AssetChecker, MissingAsset};
use crate::links::{apply_policies, format_links, BrokenKind, BrokenLink};
use crate::routes::{
    blog_index_routes, blog_post_route, blog_tag_route, doc_route, normalize_path,
    normalize_route, page_route, resolve_relative, strip_suffixes, RouteTable,
};

/// Standalone pages directory, relative to the site root.
pub const PAGES_DIR: &str = "src/pages";

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];
const PAGE_EXTENSIONS: &[&str] = &["md", "mdx", "js", "jsx", "ts", "tsx"];

/// Result of a preflight run.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of Markdown pages inspected
    pub pages: usize,

    /// Number of routes the site serves
    pub routes: usize,

    /// Number of asset references checked
    pub assets: usize,

    /// Broken links reported as warnings
    pub warnings: usize,

    /// Broken links dropped by an `ignore` policy
    pub ignored: usize,

    /// Magic comment problems in code blocks (always warnings)
    pub code_warnings: usize,

    /// Total check time in milliseconds
    pub duration_ms: u64,
}

/// Errors that fail the preflight.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse Markdown: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("{} referenced file(s) not found:\n{}", .0.len(), format_assets(.0))]
    MissingAssets(Vec<MissingAsset>),

    #[error("{} broken link(s) found:\n{}", .0.len(), format_links(.0))]
    BrokenLinks(Vec<BrokenLink>),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Config(#[from] notehub_config::ConfigError),
}

fn format_assets(assets: &[MissingAsset]) -> String {
    assets
        .iter()
        .map(|a| format!("  - {}", a))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which part of the site a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Docs,
    Blog,
    Pages,
}

/// A Markdown page found on disk.
#[derive(Debug)]
pub struct Page {
    pub section: Section,

    /// Source path, normalized and relative to the site root
    pub source_path: PathBuf,

    /// Path relative to the section directory
    pub relative_path: PathBuf,

    /// Route the page is served at
    pub route: String,

    pub doc: ParsedDoc,
}

/// Site preflight checker.
pub struct SiteChecker {
    root: PathBuf,
    config: SiteConfig,
}

impl SiteChecker {
    /// Create a checker for the site at `root`.
    pub fn new(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run every check.
    pub fn check(&self) -> Result<CheckReport, CheckError> {
        let start = Instant::now();

        let assets = AssetChecker::new(&self.root, &self.config).check();
        if !assets.missing.is_empty() {
            return Err(CheckError::MissingAssets(assets.missing));
        }

        let pages = self.discover_pages()?;
        let routes = self.build_routes(&pages);
        tracing::debug!("Site serves {} routes", routes.len());

        let code_issues = self.find_code_issues(&pages);
        for issue in &code_issues {
            tracing::warn!("{}", issue);
        }

        let broken = self.find_broken_links(&pages, &routes);
        let outcome = apply_policies(&self.config, broken);
        if !outcome.fatal.is_empty() {
            return Err(CheckError::BrokenLinks(outcome.fatal));
        }

        Ok(CheckReport {
            pages: pages.len(),
            routes: routes.len(),
            assets: assets.checked,
            warnings: outcome.warned,
            ignored: outcome.ignored,
            code_warnings: code_issues.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Discover and parse every Markdown page, in path order.
    pub fn discover_pages(&self) -> Result<Vec<Page>, CheckError> {
        let mut sources: Vec<(Section, PathBuf, PathBuf)> = Vec::new();

        if let Some(docs) = self.config.docs_options() {
            self.collect(Section::Docs, &docs.path, MARKDOWN_EXTENSIONS, &mut sources);
        }
        if let Some(blog) = self.config.blog_options() {
            self.collect(Section::Blog, &blog.path, MARKDOWN_EXTENSIONS, &mut sources);
        }
        self.collect(Section::Pages, PAGES_DIR, MARKDOWN_EXTENSIONS, &mut sources);

        let results: Vec<Result<Option<Page>, CheckError>> = sources
            .par_iter()
            .map(|(section, dir, relative)| self.load_page(*section, dir, relative))
            .collect();

        let mut pages = Vec::new();
        for result in results {
            if let Some(page) = result? {
                pages.push(page);
            }
        }
        pages.sort_by(|a, b| a.source_path.cmp(&b.source_path));

        Ok(pages)
    }

    /// Collect `(section, section dir, relative path)` for matching files under `dir`.
    fn collect(
        &self,
        section: Section,
        dir: &str,
        extensions: &[&str],
        out: &mut Vec<(Section, PathBuf, PathBuf)>,
    ) {
        let base = normalize_path(Path::new(dir));
        let abs = self.root.join(&base);
        if !abs.is_dir() {
            return;
        }

        for entry in WalkDir::new(&abs)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !extensions.contains(&ext) {
                continue;
            }

            let relative = path.strip_prefix(&abs).unwrap_or(path).to_path_buf();

            // `_partial.md` and files under `_dir/` are never routed
            let hidden = relative.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|s| s.starts_with('_'))
            });
            if hidden {
                continue;
            }

            out.push((section, base.clone(), relative));
        }
    }

    fn load_page(
        &self,
        section: Section,
        dir: &Path,
        relative: &Path,
    ) -> Result<Option<Page>, CheckError> {
        let source_path = dir.join(relative);
        let content = fs::read_to_string(self.root.join(&source_path)).map_err(|e| {
            CheckError::ReadError {
                path: source_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let doc = parse_markdown(&content).map_err(|e| CheckError::ParseError {
            path: source_path.display().to_string(),
            message: e.to_string(),
        })?;

        if doc.is_draft() {
            tracing::debug!("Skipping draft {}", source_path.display());
            return Ok(None);
        }

        let fm = doc.frontmatter.as_ref();
        let route = match section {
            Section::Docs => {
                let base = self
                    .config
                    .docs_options()
                    .map(|d| d.route_base_path.as_str())
                    .unwrap_or("docs");
                doc_route(&self.config, base, relative, fm)
            }
            Section::Blog => {
                let base = self
                    .config
                    .blog_options()
                    .map(|b| b.route_base_path.as_str())
                    .unwrap_or("blog");
                blog_post_route(&self.config, base, relative, fm)
            }
            Section::Pages => page_route(&self.config, relative),
        };

        Ok(Some(Page {
            section,
            source_path,
            relative_path: relative.to_path_buf(),
            route,
            doc,
        }))
    }

    /// Every route the site serves: pages, blog indexes and standalone pages.
    pub fn build_routes(&self, pages: &[Page]) -> RouteTable {
        let mut routes = RouteTable::new();

        for page in pages {
            routes.insert(&page.route);
        }

        if let Some(blog) = self.config.blog_options() {
            for route in blog_index_routes(&self.config, &blog.route_base_path) {
                routes.insert(&route);
            }
            for page in pages.iter().filter(|p| p.section == Section::Blog) {
                if let Some(fm) = &page.doc.frontmatter {
                    for tag in &fm.tags {
                        routes.insert(&blog_tag_route(&self.config, &blog.route_base_path, tag));
                    }
                }
            }
        }

        // Non-Markdown pages only contribute routes
        let mut scripts = Vec::new();
        self.collect(Section::Pages, PAGES_DIR, PAGE_EXTENSIONS, &mut scripts);
        for (_, _, relative) in scripts {
            routes.insert(&page_route(&self.config, &relative));
        }

        routes
    }

    /// Find broken links in the navbar, the footer and every page.
    pub fn find_broken_links(&self, pages: &[Page], routes: &RouteTable) -> Vec<BrokenLink> {
        let mut broken = Vec::new();
        let theme = &self.config.theme_config;

        for (i, item) in theme.navbar.items.iter().enumerate() {
            if let Some(LinkTarget::Internal(to)) = item.target() {
                self.check_config_link(
                    &mut broken,
                    routes,
                    format!("theme_config.navbar.items[{}]", i),
                    to,
                );
            }
        }

        for (c, column) in theme.footer.links.iter().enumerate() {
            for (i, link) in column.items.iter().enumerate() {
                if let Some(LinkTarget::Internal(to)) = link.target() {
                    self.check_config_link(
                        &mut broken,
                        routes,
                        format!("theme_config.footer.links[{}].items[{}]", c, i),
                        to,
                    );
                }
            }
        }

        let by_source: HashMap<&Path, &Page> =
            pages.iter().map(|p| (p.source_path.as_path(), p)).collect();
        let by_route: HashMap<String, &Page> = pages
            .iter()
            .map(|p| (normalize_route(&p.route), p))
            .collect();

        let page_links: Vec<Vec<BrokenLink>> = pages
            .par_iter()
            .map(|page| self.check_page_links(page, routes, &by_source, &by_route))
            .collect();
        broken.extend(page_links.into_iter().flatten());

        broken
    }

    /// Run every code block through the configured magic comments.
    pub fn find_code_issues(&self, pages: &[Page]) -> Vec<CodeIssue> {
        let rules = self.config.theme_config.prism.effective_magic_comments();
        let comments = MagicComments::new(&rules);

        let mut issues = Vec::new();
        for page in pages {
            for block in &page.doc.code_blocks {
                let highlighted = comments.apply(&block.source, &block.metastring);
                for issue in highlighted.issues {
                    // Unclosed markers point into the block body, ranges at the fence
                    let line = match &issue {
                        MagicCommentIssue::UnclosedBlock { line, .. } => {
                            block.line_number + 1 + line
                        }
                        MagicCommentIssue::LineOutOfRange { .. } => block.line_number,
                    };
                    issues.push(CodeIssue {
                        source: format!("{}:{}", page.source_path.display(), line),
                        issue,
                    });
                }
            }
        }

        issues
    }

    fn check_config_link(
        &self,
        broken: &mut Vec<BrokenLink>,
        routes: &RouteTable,
        source: String,
        to: &str,
    ) {
        let resolved = self.site_path(to);
        if !routes.contains(&resolved) && !self.is_static_file(to) {
            broken.push(BrokenLink {
                kind: BrokenKind::Link,
                source,
                target: to.to_string(),
            });
        }
    }

    fn check_page_links(
        &self,
        page: &Page,
        routes: &RouteTable,
        by_source: &HashMap<&Path, &Page>,
        by_route: &HashMap<String, &Page>,
    ) -> Vec<BrokenLink> {
        let mut broken = Vec::new();

        for link in &page.doc.links {
            let dest = link.dest.trim();
            if dest.is_empty() || is_external(dest) {
                continue;
            }

            let source = format!("{}:{}", page.source_path.display(), link.line);
            let path = strip_suffixes(dest);
            let fragment = dest.split_once('#').map(|(_, f)| f).filter(|f| !f.is_empty());

            // Same-page anchor
            if path.is_empty() {
                if let Some(fragment) = fragment {
                    if !page.doc.has_anchor(fragment) {
                        broken.push(anchor(source, dest));
                    }
                }
                continue;
            }

            let target = if is_markdown_file(path) {
                let found = self
                    .markdown_candidates(page, path)
                    .iter()
                    .find_map(|file| by_source.get(file.as_path()).copied());
                match found {
                    Some(target) => Some(target),
                    None => {
                        broken.push(BrokenLink {
                            kind: BrokenKind::MarkdownLink,
                            source,
                            target: dest.to_string(),
                        });
                        continue;
                    }
                }
            } else {
                let resolved = if path.starts_with('/') {
                    self.site_path(path)
                } else {
                    resolve_relative(&page.route, path)
                };
                if !routes.contains(&resolved) {
                    if !self.is_static_file(path) {
                        broken.push(BrokenLink {
                            kind: BrokenKind::Link,
                            source,
                            target: dest.to_string(),
                        });
                    }
                    continue;
                }
                by_route.get(&normalize_route(&resolved)).copied()
            };

            if let (Some(target), Some(fragment)) = (target, fragment) {
                if !target.doc.has_anchor(fragment) {
                    broken.push(anchor(source, dest));
                }
            }
        }

        broken
    }

    /// Files a Markdown link may point at, most specific first.
    ///
    /// `./` and `../` links only resolve next to the linking file. `/` links
    /// resolve against each content root, then the site root. Bare links try
    /// the linking file's directory first, then the same roots.
    fn markdown_candidates(&self, page: &Page, path: &str) -> Vec<PathBuf> {
        let explicit = path.starts_with("./") || path.starts_with("../");
        let relative = path.trim_start_matches('/');
        let mut candidates = Vec::new();

        if !path.starts_with('/') {
            let dir = page.source_path.parent().unwrap_or(Path::new(""));
            candidates.push(normalize_path(&dir.join(relative)));
        }
        if !explicit {
            let roots = [
                self.config.docs_options().map(|d| d.path.as_str()),
                self.config.blog_options().map(|b| b.path.as_str()),
            ];
            for root in roots.into_iter().flatten() {
                candidates.push(normalize_path(&Path::new(root).join(relative)));
            }
            candidates.push(normalize_path(Path::new(relative)));
        }

        candidates
    }

    /// Prefix a root-relative path with `base_url` unless already prefixed.
    fn site_path(&self, path: &str) -> String {
        let base = &self.config.base_url;
        if base != "/" && path.starts_with(base.as_str()) {
            path.to_string()
        } else {
            self.config.route(path)
        }
    }

    fn is_static_file(&self, path: &str) -> bool {
        let path = strip_suffixes(path);
        let base = self.config.base_url.as_str();
        let relative = path.strip_prefix(base).unwrap_or(path);
        AssetChecker::new(&self.root, &self.config)
            .find_static(relative)
            .is_some()
    }
}

/// A magic comment problem, located as `path:line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeIssue {
    pub source: String,
    pub issue: MagicCommentIssue,
}

impl std::fmt::Display for CodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.issue)
    }
}

fn anchor(source: String, dest: &str) -> BrokenLink {
    BrokenLink {
        kind: BrokenKind::Anchor,
        source,
        target: dest.to_string(),
    }
}

fn is_markdown_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MARKDOWN_EXTENSIONS.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_config::{BlogOptions, BrokenLinkPolicy, DocsOptions, Preset, PresetOptions};
    use tempfile::tempdir;

    fn site_config() -> SiteConfig {
        let mut config = SiteConfig::new("Notes", "https://notes.example.com");
        config.presets = vec![Preset::classic(PresetOptions {
            docs: Some(DocsOptions::default()),
            blog: Some(BlogOptions::default()),
            theme: None,
        })];
        config
    }

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn checks_clean_site() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n\nSee [AWS](./aws/s3.md#buckets).\n");
        write(root, "docs/aws/s3.md", "# S3\n\n## Buckets\n\nBack to [intro](../intro).\n");
        write(root, "blog/2024-01-31-hello.md", "---\ntags: [aws]\n---\n# Hello\n");
        write(root, "src/pages/index.js", "export default function Home() {}\n");

        let report = SiteChecker::new(root, site_config()).check().unwrap();

        assert_eq!(report.pages, 3);
        assert_eq!(report.warnings, 0);
        // /, docs x2, blog post, blog index/archive/tags, one tag
        assert_eq!(report.routes, 8);
    }

    #[test]
    fn throw_policy_fails_on_missing_route() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n\nSee [missing](/docs/nowhere).\n");

        let err = SiteChecker::new(root, site_config()).check().unwrap_err();
        match err {
            CheckError::BrokenLinks(links) => {
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].kind, BrokenKind::Link);
                assert_eq!(links[0].source, "docs/intro.md:3");
                assert_eq!(links[0].target, "/docs/nowhere");
            }
            other => panic!("expected broken links, got {:?}", other),
        }
    }

    #[test]
    fn warn_policy_keeps_going_on_missing_markdown_file() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n\nSee [missing](./nowhere.md).\n");

        let report = SiteChecker::new(root, site_config()).check().unwrap();
        assert_eq!(report.warnings, 1);
    }

    #[test]
    fn navbar_and_footer_links_are_checked() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n");

        let mut config = SiteConfig::notes_hub();
        config.favicon = None;
        config.theme_config.image = None;
        config.theme_config.navbar.logo = None;
        config.presets = site_config().presets;
        config.theme_config.footer.links[0].items[0].to = Some("/docs/missing".to_string());

        let err = SiteChecker::new(root, config).check().unwrap_err();
        match err {
            CheckError::BrokenLinks(links) => {
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].source, "theme_config.footer.links[0].items[0]");
            }
            other => panic!("expected broken links, got {:?}", other),
        }
    }

    #[test]
    fn broken_anchor_follows_its_policy() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n\n[jump](#nowhere)\n");

        let mut config = site_config();
        config.on_broken_anchors = BrokenLinkPolicy::Throw;

        let err = SiteChecker::new(root, config).check().unwrap_err();
        assert!(matches!(
            err,
            CheckError::BrokenLinks(ref links) if links[0].kind == BrokenKind::Anchor
        ));
    }

    #[test]
    fn links_to_static_files_are_not_broken() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "static/pdf/cheatsheet.pdf", "%PDF");
        write(root, "docs/intro.md", "# Intro\n\n[pdf](/pdf/cheatsheet.pdf)\n");

        let report = SiteChecker::new(root, site_config()).check().unwrap();
        assert_eq!(report.warnings, 0);
    }

    #[test]
    fn markdown_links_resolve_against_content_roots() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n\n[S3](/aws/s3.md)\n");
        write(root, "docs/aws/s3.md", "# S3\n");
        write(root, "blog/2024-01-31-hello.md", "# Hello\n\nSee [S3](aws/s3.md#s3).\n");

        let mut config = site_config();
        config.on_broken_markdown_links = BrokenLinkPolicy::Throw;
        config.on_broken_anchors = BrokenLinkPolicy::Throw;

        let report = SiteChecker::new(root, config.clone()).check().unwrap();
        assert_eq!(report.warnings, 0);

        // Explicitly relative links never fall back to the content roots
        write(root, "blog/2024-01-31-hello.md", "# Hello\n\nSee [S3](./aws/s3.md).\n");
        let err = SiteChecker::new(root, config).check().unwrap_err();
        match err {
            CheckError::BrokenLinks(links) => {
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].kind, BrokenKind::MarkdownLink);
                assert_eq!(links[0].source, "blog/2024-01-31-hello.md:3");
            }
            other => panic!("expected broken links, got {:?}", other),
        }
    }

    #[test]
    fn reports_magic_comment_problems() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(
            root,
            "docs/intro.md",
            concat!(
                "# Intro\n",
                "\n",
                "```python\n",
                "x = 1\n",
                "# highlight-start\n",
                "y = 2\n",
                "```\n",
                "\n",
                "```bash {1,7}\n",
                "ls\n",
                "```\n",
            ),
        );

        let checker = SiteChecker::new(root, site_config());
        let pages = checker.discover_pages().unwrap();
        let issues = checker.find_code_issues(&pages);

        let sources: Vec<_> = issues.iter().map(|i| i.source.as_str()).collect();
        assert_eq!(sources, vec!["docs/intro.md:5", "docs/intro.md:9"]);
        assert!(issues[0].to_string().contains("'highlight-start' is never closed"));
        assert_eq!(
            issues[1].issue,
            MagicCommentIssue::LineOutOfRange {
                line: 7,
                line_count: 1
            }
        );

        let report = checker.check().unwrap();
        assert_eq!(report.code_warnings, 2);
        assert_eq!(report.warnings, 0);
    }

    #[test]
    fn drafts_are_skipped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static")).unwrap();
        write(root, "docs/intro.md", "# Intro\n");
        write(root, "docs/wip.md", "---\ndraft: true\n---\n[x](/docs/nowhere)\n");

        let report = SiteChecker::new(root, site_config()).check().unwrap();
        assert_eq!(report.pages, 1);
    }

    #[test]
    fn missing_assets_fail_first() {
        let temp = tempdir().unwrap();
        let mut config = site_config();
        config.favicon = Some("img/favicon.ico".to_string());

        let err = SiteChecker::new(temp.path(), config).check().unwrap_err();
        match err {
            CheckError::MissingAssets(missing) => {
                let fields: Vec<_> = missing.iter().map(|m| m.field.as_str()).collect();
                assert_eq!(fields, vec!["favicon", "presets[0].options.docs.path"]);
            }
            other => panic!("expected missing assets, got {:?}", other),
        }
    }
}
