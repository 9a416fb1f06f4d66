//! Finding and rewriting Hunt/Test bookmarks inside a browser bookmarks export.
//!
//! The export is handled as text: folder headings and anchors are located by pattern,
//! not by parsing the HTML.

pub mod config;
pub mod document;
pub mod export;
pub mod extractor;
pub mod patterns;

pub use config::{
    HuntConfig, RewriteOptions, Settings, SlotLabel, SlotMatching, TimeRange, HUNT_SLOTS,
    TEST_SLOTS,
};
pub use document::{check_ready, update_document, SlotOutcome, SlotReport, UpdateReport};
pub use export::{output_file_name, read_document, today, write_document, OUTPUT_PREFIX};
pub use extractor::{extract_urls, ExtractedUrl, PREVIEW_URL_CHARS};
