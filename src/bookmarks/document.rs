use regex::Captures;
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::error::UpdateError;
use crate::url_rewriter::{rewrite_url, TimeWindow};

use super::config::{HuntConfig, RewriteOptions, SlotLabel};
use super::patterns::slot_regex;

/// What happened to one slot during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    /// Start or end missing, slot skipped
    Unconfigured,
    /// Configured, but no heading/anchor pair in the document
    NoMatch,
    /// Anchors found; `unknown` of them were neither Arkime nor Kibana and left alone
    Matched { rewritten: usize, unknown: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    pub key: String,
    pub label: SlotLabel,
    pub outcome: SlotOutcome,
}

impl SlotReport {
    pub fn is_configured(&self) -> bool {
        !matches!(self.outcome, SlotOutcome::Unconfigured)
    }

    /// At least one URL of this slot got a new window
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, SlotOutcome::Matched { rewritten, .. } if rewritten > 0)
    }
}

/// The rewritten document plus a per-slot tally
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub content: String,
    pub slots: Vec<SlotReport>,
}

impl UpdateReport {
    pub fn configured_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_configured()).count()
    }

    pub fn applied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_applied()).count()
    }

    pub fn rewritten_urls(&self) -> usize {
        self.slots
            .iter()
            .map(|s| match s.outcome {
                SlotOutcome::Matched { rewritten, .. } => rewritten,
                _ => 0,
            })
            .sum()
    }

    pub fn unknown_urls(&self) -> usize {
        self.slots
            .iter()
            .map(|s| match s.outcome {
                SlotOutcome::Matched { unknown, .. } => unknown,
                _ => 0,
            })
            .sum()
    }

    pub fn slot(&self, key: &str) -> Option<&SlotReport> {
        self.slots.iter().find(|s| s.key.eq_ignore_ascii_case(key))
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} configured slots were applied ({} URLs rewritten, {} left unchanged)",
            self.applied_slots(),
            self.configured_slots(),
            self.rewritten_urls(),
            self.unknown_urls()
        )
    }
}

struct SlotPlan<'a> {
    key: &'a str,
    label: SlotLabel,
    suffix: &'a str,
    window: Option<TimeWindow>,
}

/// Rewrites the URLs under every configured Hunt and Test folder heading.
///
/// Slots are handled hunts first, then tests, each in key order. The times of all
/// configured slots are parsed before the document is touched, so a malformed time
/// fails the whole call and no partial document is produced.
///
/// # Arguments
/// * `content` - The bookmarks export, as text
/// * `hunts` - Ranges for the `Hunt<N>` folders
/// * `tests` - Ranges for the `Test<N>` folders
/// * `options` - Time zone rule and slot matching mode
///
/// # Returns
/// * `Result<UpdateReport, UpdateError>` - The new document and what happened per slot
#[instrument(level = "debug", skip_all, fields(length = content.len()))]
pub fn update_document(
    content: &str,
    hunts: &HuntConfig,
    tests: &HuntConfig,
    options: &RewriteOptions,
) -> Result<UpdateReport, UpdateError> {
    let plans = plan_slots(hunts, tests, options)?;
    info!(
        "Updating bookmarks: {} of {} slots configured",
        plans.iter().filter(|p| p.window.is_some()).count(),
        plans.len()
    );

    let mut updated = content.to_string();
    let mut slots = Vec::with_capacity(plans.len());

    for plan in plans {
        let outcome = match &plan.window {
            None => {
                trace!("Skipping unconfigured slot {}", plan.key);
                SlotOutcome::Unconfigured
            }
            Some(window) => {
                let (rewritten_content, outcome) = apply_slot(&updated, &plan, window, options)?;
                updated = rewritten_content;
                outcome
            }
        };
        debug!("Slot {}: {:?}", plan.key, outcome);
        slots.push(SlotReport {
            key: plan.key.to_string(),
            label: plan.label,
            outcome,
        });
    }

    let report = UpdateReport {
        content: updated,
        slots,
    };
    info!("{}", report.summary());
    Ok(report)
}

fn plan_slots<'a>(
    hunts: &'a HuntConfig,
    tests: &'a HuntConfig,
    options: &RewriteOptions,
) -> Result<Vec<SlotPlan<'a>>, UpdateError> {
    let mut plans = Vec::with_capacity(hunts.len() + tests.len());
    for config in [hunts, tests] {
        for (key, range) in config.iter() {
            let window = if range.is_configured() {
                let window = TimeWindow::parse(&range.start, &range.end, options.zone).map_err(
                    |source| UpdateError::DateParse {
                        slot: key.to_string(),
                        source,
                    },
                )?;
                Some(window)
            } else {
                None
            };
            plans.push(SlotPlan {
                key,
                label: config.label(),
                suffix: config.slot_suffix(key),
                window,
            });
        }
    }
    Ok(plans)
}

fn apply_slot(
    content: &str,
    plan: &SlotPlan<'_>,
    window: &TimeWindow,
    options: &RewriteOptions,
) -> Result<(String, SlotOutcome), UpdateError> {
    let pattern = slot_regex(plan.label, plan.suffix, options.slot_matching).map_err(|source| {
        UpdateError::SlotPattern {
            slot: plan.key.to_string(),
            source,
        }
    })?;

    let mut rewritten = 0;
    let mut unknown = 0;
    let updated = pattern
        .replace_all(content, |caps: &Captures| {
            let result = rewrite_url(&caps[2], window);
            if result.is_rewritten() {
                rewritten += 1;
            } else {
                unknown += 1;
            }
            format!("{}{}", &caps[1], result.url)
        })
        .into_owned();

    let outcome = if rewritten + unknown == 0 {
        SlotOutcome::NoMatch
    } else {
        SlotOutcome::Matched { rewritten, unknown }
    };
    Ok((updated, outcome))
}

/// Host-side guard run before an update, so "nothing to update" can be told apart
/// from a failed update.
pub fn check_ready(content: &str, hunts: &HuntConfig, tests: &HuntConfig) -> Result<(), UpdateError> {
    if content.trim().is_empty() {
        return Err(UpdateError::EmptyDocument);
    }
    if hunts.configured_count() + tests.configured_count() == 0 {
        return Err(UpdateError::NothingConfigured);
    }
    Ok(())
}
