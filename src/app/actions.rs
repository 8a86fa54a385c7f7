//! Actions representing side effects to be executed by the console runtime.
//!
//! The event handler mutates state synchronously and returns actions for
//! anything that cannot happen inside it. Scoring is the only slow operation,
//! so it is the main action: the runtime awaits the scorer and feeds the
//! results back as [`Event::BatchScored`](crate::app::Event::BatchScored).
//!
//! # Example
//!
//! ```rust
//! use eval_console::app::Action;
//!
//! let actions = vec![Action::ScoreBatch { requests: vec![] }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::scoring::ScoringRequest;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Stops the console loop.
    Quit,

    /// Scores every request concurrently and reports back with
    /// `Event::BatchScored`.
    ///
    /// Requests snapshot the pending entries at the time the batch started.
    ScoreBatch {
        /// One request per pending evaluation entry.
        requests: Vec<ScoringRequest>,
    },
}
