//! Detection and time-window rewriting of Arkime and Kibana URLs.

pub mod dialect;
pub mod patterns;
pub mod rewriter;
pub mod timestamp;


pub use dialect::{detect_url_type, UrlDialect};
pub use rewriter::{
    apply_arkime_window, apply_kibana_window, rewrite_arkime_url, rewrite_kibana_url, rewrite_url,
    UrlRewrite,
};
pub use timestamp::{parse_local_timestamp, to_epoch_seconds, to_iso8601, TimeWindow, TimeZoneRule};
