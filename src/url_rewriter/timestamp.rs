use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat,
    TimeZone, Utc,
};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};

use crate::error::DateParseError;

/// Layouts produced by datetime pickers and typed by hand, tried in order
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a wall-clock time without an offset is pinned to an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeZoneRule {
    /// The zone of the machine running the rewrite
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TimeZoneRule {
    fn resolve(&self, naive: &NaiveDateTime) -> LocalResult<DateTime<Utc>> {
        match self {
            TimeZoneRule::Local => Local
                .from_local_datetime(naive)
                .map(|dt| dt.with_timezone(&Utc)),
            TimeZoneRule::Utc => LocalResult::Single(Utc.from_utc_datetime(naive)),
            TimeZoneRule::Fixed(offset) => offset
                .from_local_datetime(naive)
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for TimeZoneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneRule::Local => f.write_str("local"),
            TimeZoneRule::Utc => f.write_str("utc"),
            TimeZoneRule::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for TimeZoneRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneRule::Local);
        }
        if value.eq_ignore_ascii_case("utc") || value == "Z" || value == "z" {
            return Ok(TimeZoneRule::Utc);
        }
        parse_offset(value).map(TimeZoneRule::Fixed)
    }
}

impl TryFrom<String> for TimeZoneRule {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// Accepts +HH, +HHMM and +HH:MM
fn parse_offset(value: &str) -> Result<FixedOffset, String> {
    let invalid = || format!("unrecognised time zone rule {:?}", value);

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Parses a picker-style timestamp into a UTC instant.
///
/// Strings carrying their own offset (RFC 3339) are taken as-is; bare date-times and
/// dates are pinned with `zone`. Around DST changes they behave like a browser `Date`: an
/// ambiguous time takes the earlier instant, a skipped one moves forward by the gap.
pub fn parse_local_timestamp(input: &str, zone: TimeZoneRule) -> Result<DateTime<Utc>, DateParseError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(DateParseError::new(input, "timestamp is empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        trace!("Parsed {} as RFC 3339", value);
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateParseError::new(input, "unrecognised date/time format"))?;

    resolve_wall_clock(&naive, |n| zone.resolve(n)).ok_or_else(|| {
        DateParseError::new(input, format!("time cannot be placed in {} time", zone))
    })
}

/// Pins a wall-clock time to an instant the way a browser `Date` does.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a spring-forward
/// gap are read with the offset in force before the gap, which moves them forward by the
/// gap length (02:30 in New York on 2024-03-10 becomes 03:30 EDT).
fn resolve_wall_clock<F>(naive: &NaiveDateTime, resolve: F) -> Option<DateTime<Utc>>
where
    F: Fn(&NaiveDateTime) -> LocalResult<DateTime<Utc>>,
{
    match resolve(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => {
            warn!("{} is ambiguous, using the earlier instant", naive);
            Some(earliest)
        }
        LocalResult::None => {
            let before = naive.checked_sub_signed(Duration::days(1))?;
            let offset = before.signed_duration_since(resolve(&before).earliest()?.naive_utc());
            let shifted = Utc.from_utc_datetime(&naive.checked_sub_signed(offset)?);
            warn!(
                "{} falls in a daylight saving gap, moved forward to {}",
                naive,
                to_iso8601(&shifted)
            );
            Some(shifted)
        }
    }
}

/// Whole seconds since the Unix epoch, rounded down
pub fn to_epoch_seconds(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp()
}

/// ISO 8601 with millisecond precision and a `Z` suffix, e.g. `2024-01-01T00:00:00.000Z`
pub fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A parsed start/end pair ready to be written into URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn parse(start: &str, end: &str, zone: TimeZoneRule) -> Result<Self, DateParseError> {
        let window = TimeWindow {
            start: parse_local_timestamp(start, zone)?,
            end: parse_local_timestamp(end, zone)?,
        };
        if window.start > window.end {
            warn!("Time window starts after it ends: {} > {}", start, end);
        }
        debug!(
            "Time window {} -> {} ({} rule)",
            window.start_iso(),
            window.end_iso(),
            zone
        );
        Ok(window)
    }

    pub fn start_epoch(&self) -> i64 {
        to_epoch_seconds(&self.start)
    }

    pub fn end_epoch(&self) -> i64 {
        to_epoch_seconds(&self.end)
    }

    pub fn start_iso(&self) -> String {
        to_iso8601(&self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso8601(&self.end)
    }
}
