//! Re-points Arkime and Kibana bookmarks at a new time window.
//!
//! An exported bookmarks file is scanned for anchors under `Hunt<N>` and `Test<N>`
//! folder headings, and the time parameters of every recognised URL are rewritten
//! for the range configured for that folder.

pub mod bookmarks;
pub mod error;
pub mod url_rewriter;
pub mod utils;

pub use bookmarks::{
    check_ready, extract_urls, update_document, ExtractedUrl, HuntConfig, RewriteOptions,
    Settings, SlotMatching, TimeRange, UpdateReport,
};
pub use error::{DateParseError, UpdateError};
pub use url_rewriter::{detect_url_type, rewrite_arkime_url, rewrite_kibana_url, TimeZoneRule, UrlDialect};
