use serde::Serialize;
use tracing::debug;

use crate::url_rewriter::{detect_url_type, UrlDialect};

use super::patterns::ANCHOR_REGEX;

/// Length the preview cuts URLs down to
pub const PREVIEW_URL_CHARS: usize = 80;

/// A recognised bookmark, for previewing what an update will touch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedUrl {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub dialect: UrlDialect,
}

impl ExtractedUrl {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// The URL cut to `max_chars` characters, with `...` when something was dropped
    pub fn excerpt(&self, max_chars: usize) -> String {
        match self.url.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.url[..idx]),
            None => self.url.clone(),
        }
    }
}

/// Lists every Arkime and Kibana anchor in document order. Other links are skipped.
pub fn extract_urls(content: &str) -> Vec<ExtractedUrl> {
    let urls: Vec<ExtractedUrl> = ANCHOR_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let url = &caps[1];
            let dialect = detect_url_type(url);
            dialect.is_known().then(|| ExtractedUrl {
                title: caps[2].to_string(),
                url: url.to_string(),
                dialect,
            })
        })
        .collect();
    debug!("Extracted {} recognised URLs", urls.len());
    urls
}
