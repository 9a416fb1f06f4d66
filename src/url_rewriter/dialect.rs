use serde::Serialize;
use std::fmt;

/// The URL families whose time window we know how to rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlDialect {
    Arkime,
    Kibana,
    Unknown,
}

impl UrlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlDialect::Arkime => "arkime",
            UrlDialect::Kibana => "kibana",
            UrlDialect::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, UrlDialect::Unknown)
    }
}

impl fmt::Display for UrlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a URL by the time parameters it carries.
///
/// Arkime wins when a URL carries both families of markers.
pub fn detect_url_type(url: &str) -> UrlDialect {
    if url.contains("startTime=") && url.contains("stopTime=") {
        UrlDialect::Arkime
    } else if url.contains("from:'") && url.contains("to:'") {
        UrlDialect::Kibana
    } else {
        UrlDialect::Unknown
    }
}
