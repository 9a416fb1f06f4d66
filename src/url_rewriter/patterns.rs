use once_cell::sync::Lazy;
use regex::Regex;

// Arkime keeps its window in epoch-second query parameters
pub static ARKIME_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"startTime=[0-9]+").unwrap()
});

pub static ARKIME_STOP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"stopTime=[0-9]+").unwrap()
});

// Kibana keeps it in single-quoted rison values inside the _g fragment
pub static KIBANA_FROM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"from:'[^']+'").unwrap()
});

pub static KIBANA_TO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"to:'[^']+'").unwrap()
});
