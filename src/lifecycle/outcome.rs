//! Observable results of lifecycle operations.
//!
//! Every precondition violation is a no-op rather than an error, but callers
//! can still tell "already done" apart from "just done" by matching on these.

/// Result of [`promote`](super::promote).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// A pending evaluation entry was created for the log.
    Promoted,
    /// The log already has a live evaluation entry; nothing changed.
    AlreadyInEvaluation,
    /// No log has this id; nothing changed.
    UnknownLog,
}

/// Result of [`retract`](super::retract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetractOutcome {
    /// The entry was removed.
    Retracted {
        /// True if it was the last live entry for its log, whose
        /// `is_added_to_eval` flag was therefore cleared.
        root_released: bool,
    },
    /// No entry has this id; nothing changed.
    NotFound,
}

/// Result of [`re_submit`](super::re_submit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReSubmitOutcome {
    /// A pending descendant was created.
    ReSubmitted {
        /// Id of the new entry.
        new_id: String,
    },
    /// The entry has already produced a descendant; nothing changed.
    AlreadyReSubmitted,
    /// No entry has this id; nothing changed.
    NotFound,
}

/// Result of [`score_entry`](super::score_entry) and [`annotate`](super::annotate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// Summary of one committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries moved to completed.
    pub completed: Vec<String>,
    /// Entries left pending, with the failure message attached to each.
    pub failed: Vec<(String, String)>,
    /// Results ignored because their entry was gone or no longer pending.
    pub skipped: Vec<String>,
}

impl BatchReport {
    /// True if the batch changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.failed.is_empty()
    }
}
