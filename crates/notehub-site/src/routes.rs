//! Route derivation for docs pages, blog posts and standalone pages.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use notehub_config::SiteConfig;
use notehub_mdx::Frontmatter;

/// `2024-01-31-my-post` → date parts and name.
static DATED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").expect("date pattern is valid")
});

/// `01-intro` → `intro`
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-_.]\s*").expect("number prefix pattern is valid"));

/// Every route the built site will serve.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeSet<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: &str) {
        self.routes.insert(normalize_route(route));
    }

    /// Whether `path` (query and fragment ignored) is served.
    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains(&normalize_route(strip_suffixes(path)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }
}

/// Drop a trailing slash, except for the root.
pub fn normalize_route(route: &str) -> String {
    let trimmed = route.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Remove `?query` and `#fragment`.
pub fn strip_suffixes(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Join route segments under the site's base URL.
pub fn join_route(config: &SiteConfig, segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    normalize_route(&config.route(&joined))
}

/// Route of a docs page at `relative` (path inside the docs directory).
pub fn doc_route(
    config: &SiteConfig,
    route_base_path: &str,
    relative: &Path,
    frontmatter: Option<&Frontmatter>,
) -> String {
    let parent = url_segments(relative.parent().unwrap_or(Path::new("")));

    if let Some(slug) = frontmatter.and_then(|f| f.slug.as_deref()) {
        if slug.starts_with('/') {
            return join_route(config, &[route_base_path, slug]);
        }
        return join_route(config, &[route_base_path, parent.as_str(), slug]);
    }

    let stem = relative.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if is_index(stem) {
        return join_route(config, &[route_base_path, parent.as_str()]);
    }

    let name = frontmatter
        .and_then(|f| f.id.as_deref())
        .unwrap_or_else(|| strip_number_prefix(stem));
    join_route(config, &[route_base_path, parent.as_str(), name])
}

/// Route of a blog post at `relative` (path inside the blog directory).
pub fn blog_post_route(
    config: &SiteConfig,
    route_base_path: &str,
    relative: &Path,
    frontmatter: Option<&Frontmatter>,
) -> String {
    if let Some(slug) = frontmatter.and_then(|f| f.slug.as_deref()) {
        return join_route(config, &[route_base_path, slug]);
    }

    // A post folder `2024-01-31-post/index.md` is named by its directory
    let stem = relative.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let (dir, name) = if is_index(stem) {
        let parent = relative.parent().unwrap_or(Path::new(""));
        let name = parent
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        (parent.parent().unwrap_or(Path::new("")), name)
    } else {
        (relative.parent().unwrap_or(Path::new("")), stem.to_string())
    };

    let dir = url_segments(dir);
    match DATED_NAME.captures(&name) {
        Some(caps) => join_route(
            config,
            &[route_base_path, dir.as_str(), &caps[1], &caps[2], &caps[3], &caps[4]],
        ),
        None => join_route(config, &[route_base_path, dir.as_str(), name.as_str()]),
    }
}

/// Routes every blog has besides its posts.
pub fn blog_index_routes(config: &SiteConfig, route_base_path: &str) -> Vec<String> {
    vec![
        join_route(config, &[route_base_path]),
        join_route(config, &[route_base_path, "archive"]),
        join_route(config, &[route_base_path, "tags"]),
    ]
}

pub fn blog_tag_route(config: &SiteConfig, route_base_path: &str, tag: &str) -> String {
    join_route(config, &[route_base_path, "tags", notehub_mdx::slugify(tag).as_str()])
}

/// Route of a standalone page under `src/pages`.
pub fn page_route(config: &SiteConfig, relative: &Path) -> String {
    let parent = url_segments(relative.parent().unwrap_or(Path::new("")));
    let stem = relative.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if is_index(stem) {
        join_route(config, &[parent.as_str()])
    } else {
        join_route(config, &[parent.as_str(), stem])
    }
}

/// Resolve `target` against the URL of the page at `route`, like a browser would.
pub fn resolve_relative(route: &str, target: &str) -> String {
    let mut segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    // The page itself is the last segment
    segments.pop();

    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Lexically normalize a filesystem path (`a/./b/../c` → `a/c`).
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn is_index(stem: &str) -> bool {
    stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme")
}

fn strip_number_prefix(name: &str) -> &str {
    match NUMBER_PREFIX.find(name) {
        Some(m) if m.end() < name.len() => &name[m.end()..],
        _ => name,
    }
}

fn url_segments(dir: &Path) -> String {
    dir.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .map(strip_number_prefix)
        .collect::<Vec<_>>()
        .join("/")
}
