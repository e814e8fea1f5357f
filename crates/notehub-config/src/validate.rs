//! Shared field checks used by the section validators.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::ConfigDiagnostics;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").expect("identifier pattern is valid")
});

static LOCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("locale pattern is valid")
});

/// Report an error when `value` is empty or whitespace.
pub(crate) fn non_empty(diag: &mut ConfigDiagnostics, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        diag.error(field, "must not be empty");
        false
    } else {
        true
    }
}

/// Check an absolute `http`/`https` URL with a host.
pub(crate) fn absolute_url(diag: &mut ConfigDiagnostics, field: &str, value: &str) -> Option<Url> {
    match Url::parse(value) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                diag.error_with_hint(
                    field,
                    format!("scheme '{}' not supported, must be http or https", parsed.scheme()),
                    "use format like https://example.com",
                );
                return None;
            }
            if parsed.host_str().is_none() {
                diag.error_with_hint(
                    field,
                    "URL must have a valid host",
                    "use format like https://example.com",
                );
                return None;
            }
            Some(parsed)
        }
        Err(e) => {
            diag.error_with_hint(
                field,
                format!("invalid URL '{}': {}", value, e),
                "use format like https://example.com",
            );
            None
        }
    }
}

/// Check a root-relative site path such as `/blog` or `/docs/intro`.
pub(crate) fn internal_path(diag: &mut ConfigDiagnostics, field: &str, value: &str) {
    if !value.starts_with('/') {
        diag.error_with_hint(
            field,
            format!("internal link '{}' must start with '/'", value),
            "use `href` for external links",
        );
    } else if value.starts_with("//") || value.chars().any(char::is_whitespace) {
        diag.error(field, format!("'{}' is not a valid site path", value));
    }
}

/// Check a deployment identifier (organization or project name).
pub(crate) fn identifier(diag: &mut ConfigDiagnostics, field: &str, value: &str) {
    if !IDENTIFIER.is_match(value) {
        diag.error_with_hint(
            field,
            format!("'{}' is not a valid identifier", value),
            "use letters, digits, '.', '_' or '-'",
        );
    }
}

/// Whether `code` looks like a BCP 47 locale tag (`en`, `zh-Hans`, `pt-BR`).
pub(crate) fn is_locale(code: &str) -> bool {
    LOCALE.is_match(code)
}

/// Whether `path` is a URL rather than a file reference.
pub fn is_external(path: &str) -> bool {
    path.starts_with("//") || Url::parse(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_url() {
        let mut diag = ConfigDiagnostics::new();
        assert!(absolute_url(&mut diag, "url", "https://notes.sreboy.com").is_some());
        assert!(diag.is_empty());
    }

    #[test]
    fn rejects_bad_urls() {
        let mut diag = ConfigDiagnostics::new();
        absolute_url(&mut diag, "a", "notes.sreboy.com");
        absolute_url(&mut diag, "b", "ftp://example.com");
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn internal_paths() {
        let mut diag = ConfigDiagnostics::new();
        internal_path(&mut diag, "ok", "/docs/intro");
        internal_path(&mut diag, "relative", "docs/intro");
        internal_path(&mut diag, "protocol", "//cdn.example.com");
        assert!(!diag.has_field("ok"));
        assert!(diag.has_field("relative"));
        assert!(diag.has_field("protocol"));
    }

    #[test]
    fn locale_codes() {
        assert!(is_locale("en"));
        assert!(is_locale("zh-Hans"));
        assert!(is_locale("pt-BR"));
        assert!(!is_locale("EN"));
        assert!(!is_locale("english"));
        assert!(!is_locale(""));
    }

    #[test]
    fn detects_external_paths() {
        assert!(is_external("https://example.com/logo.svg"));
        assert!(is_external("//cdn.example.com/logo.svg"));
        assert!(!is_external("img/logo.svg"));
        assert!(!is_external("/img/logo.svg"));
    }
}
