//! Navigation state types for the console.
//!
//! The console shows one of two main tabs. The log tab is further split by
//! user partition, which lives in [`LogFilter::user_type`](crate::view::LogFilter)
//! because it behaves like an always-on filter. The evaluation tab shows one
//! of three queues.
//!
//! # Example
//!
//! ```rust
//! use eval_console::app::modes::{EvalQueue, MainTab};
//!
//! let tab = MainTab::Evaluation;
//! let queue = EvalQueue::Completed;
//! assert_eq!(queue.label(), "Completed");
//! # let _ = tab;
//! ```

/// Top-level tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainTab {
    /// Raw question/answer logs of one user partition.
    #[default]
    Logs,

    /// The evaluation queues.
    Evaluation,
}

/// Queue shown inside the evaluation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalQueue {
    /// Entries waiting for the next batch run.
    #[default]
    Pending,

    /// Scored entries whose human score is still below the pass threshold.
    Completed,

    /// Scored entries a reviewer has passed.
    Resolved,
}

impl EvalQueue {
    /// All queues in tab order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Resolved];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Resolved => "Resolved",
        }
    }
}
