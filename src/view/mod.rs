//! View projector: filtered, sorted read-only views over the store.
//!
//! | View | Rows | Date filter on | Order |
//! |------|------|----------------|-------|
//! | [`log_view`] | logs of one partition | - | store order |
//! | [`pending_queue`] | pending entries | joined date | joined date, newest first |
//! | [`completed_queue`] | completed, human score < 3 | batch date | batch date, newest first |
//! | [`resolved_queue`] | completed, human score ≥ 3 | batch date | batch date, newest first |
//!
//! # Modules
//!
//! - `filters`: Predicate types and the "all" sentinel
//! - `projector`: The view queries

pub mod filters;
pub mod projector;

pub use filters::{contains_ignore_case, Choice, EvalFilter, LogFilter, ScoreFilter};
pub use projector::{
    completed_queue, log_view, pending_queue, queue_counts, resolved_queue, QueueCounts,
};
