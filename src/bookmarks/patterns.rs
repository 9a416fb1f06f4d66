use once_cell::sync::Lazy;
use regex::Regex;

use super::config::{SlotLabel, SlotMatching};

/// An anchor with a quoted HREF, capturing the URL and the text up to the next tag
pub static ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<A[^>]*HREF="([^"]+)"[^>]*>([^<]*)<"#).unwrap()
});

/// Builds the pattern for one slot's folder heading and the anchor that follows it.
///
/// Group 1 runs from the heading text through `HREF="`, group 2 is the URL.
pub fn slot_regex(label: SlotLabel, suffix: &str, matching: SlotMatching) -> Result<Regex, regex::Error> {
    let boundary = match matching {
        SlotMatching::Prefix => "",
        SlotMatching::WordBoundary => r"\b",
    };
    let pattern = format!(
        r#"(?i)({}\s*{}{}[^<]*<A[^>]*HREF=")([^"]+)"#,
        label.as_str(),
        regex::escape(suffix),
        boundary
    );
    Regex::new(&pattern)
}
