//! Copyright year substitution.

use chrono::Datelike;

/// Placeholder replaced with the current year.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// The current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Substitute every `{year}` in `template`.
pub fn render_copyright(template: &str, year: i32) -> String {
    template.replace(YEAR_PLACEHOLDER, &year.to_string())
}
