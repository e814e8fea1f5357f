//! Build preflight for notehub sites.
//!
//! Checks a site against its configuration before the build tool sees it:
//! referenced files exist, and every internal link, Markdown file link and
//! heading anchor resolves, with each kind of failure handled by its policy.

pub mod assets;
pub mod checker;
pub mod export;
pub mod links;
pub mod routes;

pub use assets::{AssetChecker, MissingAsset};
pub use checker::{CheckError, CheckReport, CodeIssue, Page, Section, SiteChecker};
pub use export::{export_config, DEFAULT_EXPORT_PATH};
pub use links::{BrokenKind, BrokenLink};
pub use routes::RouteTable;
