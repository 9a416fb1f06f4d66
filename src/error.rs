use std::{error::Error, fmt};

/// A time string that could not be turned into an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    input: String,
    reason: String,
}

impl DateParseError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// The raw value that was rejected
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp {:?}: {}", self.input, self.reason)
    }
}

impl Error for DateParseError {}

/// Failures of a bookmark update.
///
/// `DateParse` and `SlotPattern` abort [`update_document`](crate::bookmarks::update_document)
/// without returning any content. `EmptyDocument` and `NothingConfigured` come from
/// [`check_ready`](crate::bookmarks::check_ready) and mean there was nothing to do.
#[derive(Debug)]
pub enum UpdateError {
    DateParse { slot: String, source: DateParseError },
    SlotPattern { slot: String, source: regex::Error },
    EmptyDocument,
    NothingConfigured,
}

impl UpdateError {
    /// True when the update was refused for lack of input rather than bad input
    pub fn is_nothing_to_update(&self) -> bool {
        matches!(self, UpdateError::EmptyDocument | UpdateError::NothingConfigured)
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UpdateError::*;
        match self {
            DateParse { slot, source } => write!(f, "update failed for {}: {}", slot, source),
            SlotPattern { slot, source } => {
                write!(f, "update failed for {}: bad slot pattern: {}", slot, source)
            }
            EmptyDocument => write!(f, "nothing to update: no bookmark content loaded"),
            NothingConfigured => write!(f, "nothing to update: no time ranges configured"),
        }
    }
}

impl Error for UpdateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use UpdateError::*;
        match self {
            DateParse { source, .. } => Some(source),
            SlotPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}
