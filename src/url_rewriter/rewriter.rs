use regex::NoExpand;
use tracing::{debug, trace};

use crate::error::DateParseError;

use super::dialect::{detect_url_type, UrlDialect};
use super::patterns::{ARKIME_START_REGEX, ARKIME_STOP_REGEX, KIBANA_FROM_REGEX, KIBANA_TO_REGEX};
use super::timestamp::{TimeWindow, TimeZoneRule};

/// Result of pushing a single URL through [`rewrite_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewrite {
    pub dialect: UrlDialect, // Dialect the URL was detected as
    pub url: String,         // The rewritten URL, or the original when the dialect is unknown
}

impl UrlRewrite {
    pub fn is_rewritten(&self) -> bool {
        self.dialect.is_known()
    }
}

/// Points an Arkime URL at a new window.
///
/// Both times are parsed under `zone` and written as epoch seconds into every
/// `stopTime=` and `startTime=` parameter. A URL without those parameters comes back
/// unchanged.
///
/// # Arguments
/// * `url` - The Arkime URL to rewrite
/// * `start` - Window start, as typed into a datetime picker
/// * `end` - Window end, same format as `start`
/// * `zone` - Rule used to pin offset-less times to an instant
///
/// # Returns
/// * `Result<String, DateParseError>` - The rewritten URL, or the time that failed to parse
pub fn rewrite_arkime_url(
    url: &str,
    start: &str,
    end: &str,
    zone: TimeZoneRule,
) -> Result<String, DateParseError> {
    let window = TimeWindow::parse(start, end, zone)?;
    Ok(apply_arkime_window(url, &window))
}

/// Points a Kibana URL at a new window.
///
/// Every `from:'...'` and `to:'...'` value is replaced with the ISO 8601 form of the
/// new start and end. A URL without those values comes back unchanged.
pub fn rewrite_kibana_url(
    url: &str,
    start: &str,
    end: &str,
    zone: TimeZoneRule,
) -> Result<String, DateParseError> {
    let window = TimeWindow::parse(start, end, zone)?;
    Ok(apply_kibana_window(url, &window))
}

/// Writes an already parsed window into an Arkime URL
pub fn apply_arkime_window(url: &str, window: &TimeWindow) -> String {
    let stop = format!("stopTime={}", window.end_epoch());
    let start = format!("startTime={}", window.start_epoch());

    let updated = ARKIME_STOP_REGEX.replace_all(url, NoExpand(&stop));
    let updated = ARKIME_START_REGEX.replace_all(&updated, NoExpand(&start)).into_owned();
    trace!("Arkime URL rewritten: {}", updated);
    updated
}

/// Writes an already parsed window into a Kibana URL
pub fn apply_kibana_window(url: &str, window: &TimeWindow) -> String {
    let from = format!("from:'{}'", window.start_iso());
    let to = format!("to:'{}'", window.end_iso());

    let updated = KIBANA_FROM_REGEX.replace_all(url, NoExpand(&from));
    let updated = KIBANA_TO_REGEX.replace_all(&updated, NoExpand(&to)).into_owned();
    trace!("Kibana URL rewritten: {}", updated);
    updated
}

/// Detects the dialect of `url` and rewrites it with `window`.
///
/// Unknown URLs are passed through untouched.
pub fn rewrite_url(url: &str, window: &TimeWindow) -> UrlRewrite {
    let dialect = detect_url_type(url);
    let url = match dialect {
        UrlDialect::Arkime => apply_arkime_window(url, window),
        UrlDialect::Kibana => apply_kibana_window(url, window),
        UrlDialect::Unknown => {
            debug!("Leaving unrecognised URL unchanged: {}", url);
            url.to_string()
        }
    };
    UrlRewrite { dialect, url }
}
