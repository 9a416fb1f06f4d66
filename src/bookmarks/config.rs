use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::url_rewriter::TimeZoneRule;

/// Number of hunt folders an analyst works with
pub const HUNT_SLOTS: usize = 7;

/// Number of test folders an analyst works with
pub const TEST_SLOTS: usize = 2;

/// Prefix for environment overrides, e.g. `BOOKMARK_UPDATER__HUNTS__HUNT1__START`
pub const ENV_PREFIX: &str = "BOOKMARK_UPDATER";

/// A start/end pair as typed into the form. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Only ranges with both ends filled in take part in a rewrite
    pub fn is_configured(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

/// Folder family a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotLabel {
    Hunt,
    Test,
}

impl SlotLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotLabel::Hunt => "Hunt",
            SlotLabel::Test => "Test",
        }
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly a slot's number must match the folder heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMatching {
    /// `Hunt1` also matches a `Hunt11` heading
    #[default]
    Prefix,
    /// The number must end at a word boundary
    WordBoundary,
}

/// Knobs for a rewrite, owned by the caller and passed on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RewriteOptions {
    #[serde(default)]
    pub zone: TimeZoneRule,
    #[serde(default)]
    pub slot_matching: SlotMatching,
}

/// Time ranges keyed by folder slot (`Hunt1`, `Test2`, ...), in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntConfig {
    label: SlotLabel,
    slots: Vec<(String, TimeRange)>,
}

impl HuntConfig {
    /// An empty config; slots are added with [`HuntConfig::insert`]
    pub fn new(label: SlotLabel) -> Self {
        Self {
            label,
            slots: Vec::new(),
        }
    }

    /// `count` unset slots named `<label>1` through `<label><count>`
    pub fn with_slots(label: SlotLabel, count: usize) -> Self {
        let slots = (1..=count)
            .map(|n| (format!("{}{}", label, n), TimeRange::default()))
            .collect();
        Self { label, slots }
    }

    pub fn default_hunts() -> Self {
        Self::with_slots(SlotLabel::Hunt, HUNT_SLOTS)
    }

    pub fn default_tests() -> Self {
        Self::with_slots(SlotLabel::Test, TEST_SLOTS)
    }

    pub fn label(&self) -> SlotLabel {
        self.label
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TimeRange> {
        self.position(key).map(|i| &self.slots[i].1)
    }

    /// Replaces the range of an existing slot. Returns false for unknown keys.
    pub fn set_range(&mut self, key: &str, range: TimeRange) -> bool {
        match self.position(key) {
            Some(i) => {
                self.slots[i].1 = range;
                true
            }
            None => false,
        }
    }

    pub fn set_start(&mut self, key: &str, start: impl Into<String>) -> bool {
        match self.position(key) {
            Some(i) => {
                self.slots[i].1.start = start.into();
                true
            }
            None => false,
        }
    }

    pub fn set_end(&mut self, key: &str, end: impl Into<String>) -> bool {
        match self.position(key) {
            Some(i) => {
                self.slots[i].1.end = end.into();
                true
            }
            None => false,
        }
    }

    /// Sets a slot, appending it when the key is new
    pub fn insert(&mut self, key: impl Into<String>, range: TimeRange) {
        let key = key.into();
        if !self.set_range(&key, range.clone()) {
            self.slots.push((key, range));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeRange)> {
        self.slots.iter().map(|(key, range)| (key.as_str(), range))
    }

    /// Slots with both ends set
    pub fn configured_count(&self) -> usize {
        self.slots.iter().filter(|(_, range)| range.is_configured()).count()
    }

    /// The part of `key` after the folder label, e.g. `"3"` for `"Hunt3"`.
    /// Keys without the label are used whole.
    pub fn slot_suffix<'a>(&self, key: &'a str) -> &'a str {
        let label = self.label.as_str();
        match key.get(..label.len()) {
            Some(head) if head.eq_ignore_ascii_case(label) => &key[label.len()..],
            _ => key,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(key))
    }
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self::default_hunts()
    }
}

/// Everything a host needs for one run: options plus the raw slot ranges
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub options: RewriteOptions,
    #[serde(default)]
    pub hunts: BTreeMap<String, TimeRange>,
    #[serde(default)]
    pub tests: BTreeMap<String, TimeRange>,
}

impl Settings {
    /// Loads settings from an optional file (TOML, YAML, JSON, ...) overlaid with
    /// `BOOKMARK_UPDATER__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Loading settings from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to read bookmark updater settings")?
            .try_deserialize()
            .context("Invalid bookmark updater settings")?;

        debug!(
            "Settings loaded: zone={}, slot_matching={:?}, {} hunt and {} test ranges",
            settings.options.zone,
            settings.options.slot_matching,
            settings.hunts.len(),
            settings.tests.len()
        );
        Ok(settings)
    }

    /// The default hunt slots with configured ranges applied
    pub fn hunt_config(&self) -> HuntConfig {
        merge_ranges(HuntConfig::default_hunts(), &self.hunts)
    }

    /// The default test slots with configured ranges applied
    pub fn test_config(&self) -> HuntConfig {
        merge_ranges(HuntConfig::default_tests(), &self.tests)
    }
}

// Settings keys arrive lowercased from the config crate, so lookups ignore case
fn merge_ranges(mut config: HuntConfig, ranges: &BTreeMap<String, TimeRange>) -> HuntConfig {
    for (key, range) in ranges {
        if !config.set_range(key, range.clone()) {
            warn!("Slot {} is not a default {} slot, processing it anyway", key, config.label());
            config.insert(key.clone(), range.clone());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_slots() {
        let hunts = HuntConfig::default_hunts();
        let keys: Vec<&str> = hunts.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Hunt1", "Hunt2", "Hunt3", "Hunt4", "Hunt5", "Hunt6", "Hunt7"]);

        let tests = HuntConfig::default_tests();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests.label(), SlotLabel::Test);
        assert_eq!(tests.configured_count(), 0);
    }

    #[test]
    fn test_partial_range_is_not_configured() {
        assert!(!TimeRange::new("2024-01-01T00:00", "").is_configured());
        assert!(!TimeRange::new("", "2024-01-01T00:00").is_configured());
        assert!(TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00").is_configured());
    }

    #[test]
    fn test_configured_count() {
        let mut hunts = HuntConfig::default_hunts();
        assert!(hunts.set_range("Hunt2", TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00")));
        assert!(hunts.set_start("Hunt5", "2024-01-01T00:00"));
        assert_eq!(hunts.configured_count(), 1);

        assert!(hunts.set_end("Hunt5", "2024-01-03T00:00"));
        assert_eq!(hunts.configured_count(), 2);
    }

    #[test]
    fn test_set_range_keeps_keys_fixed() {
        let mut tests = HuntConfig::default_tests();
        assert!(!tests.set_range("Test9", TimeRange::new("a", "b")));
        assert_eq!(tests.len(), 2);

        tests.insert("Test9", TimeRange::new("a", "b"));
        assert_eq!(tests.len(), 3);
        assert_eq!(tests.get("test9").map(|r| r.start.as_str()), Some("a"));
    }

    #[test]
    fn test_slot_suffix() {
        let hunts = HuntConfig::default_hunts();
        assert_eq!(hunts.slot_suffix("Hunt3"), "3");
        assert_eq!(hunts.slot_suffix("hunt12"), "12");
        assert_eq!(hunts.slot_suffix("Alpha"), "Alpha");
        assert_eq!(hunts.slot_suffix("Hu"), "Hu");
    }

    #[test]
    fn test_settings_from_file() {
        let dir = std::env::temp_dir().join(format!("bookmark_settings_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        fs::write(
            &path,
            r#"
[options]
zone = "utc"
slot_matching = "word_boundary"

[hunts.Hunt3]
start = "2024-01-01T00:00"
end = "2024-01-02T00:00"

[hunts.Hunt9]
start = "2024-02-01T00:00"
end = "2024-02-02T00:00"

[tests.Test1]
start = "2024-01-05T00:00"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).expect("Failed to load settings");
        assert_eq!(settings.options.zone, TimeZoneRule::Utc);
        assert_eq!(settings.options.slot_matching, SlotMatching::WordBoundary);

        let hunts = settings.hunt_config();
        assert_eq!(hunts.len(), 8);
        assert_eq!(hunts.configured_count(), 2);
        assert!(hunts.get("Hunt3").unwrap().is_configured());

        let tests = settings.test_config();
        assert_eq!(tests.configured_count(), 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_settings_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("bookmark_settings_does_not_exist.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }
}
