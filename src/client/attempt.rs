//! Per-attempt results of a completion batch.

use crate::transport::TransportError;

/// Prefix of the text substituted for a failed attempt.
pub const ERROR_PREFIX: &str = "API error: ";

/// Outcome of one network attempt. Failures carry their description as text
/// so a batch always yields one slot per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Completed(String),
    Failed(String),
}

impl AttemptOutcome {
    pub fn failed(err: &TransportError) -> Self {
        AttemptOutcome::Failed(format!("{}{}", ERROR_PREFIX, err))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AttemptOutcome::Completed(_))
    }

    pub fn text(&self) -> &str {
        match self {
            AttemptOutcome::Completed(text) | AttemptOutcome::Failed(text) => text,
        }
    }

    /// The text variants recorded for this attempt in a cache entry.
    pub fn into_variants(self) -> Vec<String> {
        match self {
            AttemptOutcome::Completed(text) | AttemptOutcome::Failed(text) => vec![text],
        }
    }
}

impl From<std::result::Result<String, TransportError>> for AttemptOutcome {
    fn from(result: std::result::Result<String, TransportError>) -> Self {
        match result {
            Ok(text) => AttemptOutcome::Completed(text),
            Err(e) => AttemptOutcome::failed(&e),
        }
    }
}
