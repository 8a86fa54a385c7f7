//! Lifecycle engine for evaluation entries.
//!
//! The only write path into the [`EntryStore`](crate::store::EntryStore). Entries
//! move through these states:
//!
//! ```text
//!   LogEntry ──promote──▶ pending ──batch──▶ completed ──human ≥ 3──▶ resolved
//!                            ▲                   │
//!                            └────re_submit──────┘   (new lineage-linked entry)
//!
//!   retract(any entry) ── clears the log's membership flag once its last entry is gone
//! ```
//!
//! Operations never fail. Precondition violations are no-ops reported through
//! the outcome enums in [`outcome`].
//!
//! # Modules
//!
//! - `engine`: promote, retract, re-submit, score, annotate, reclassify
//! - `batch`: Two-phase batch processing against a scoring backend
//! - `outcome`: Operation results and batch reports

pub mod batch;
pub mod engine;
pub mod outcome;

pub use batch::{apply_scoring, batch_process, scoring_requests};
pub use engine::{annotate, promote, re_submit, reclassify, retract, score_entry};
pub use outcome::{BatchReport, PromoteOutcome, ReSubmitOutcome, RetractOutcome, UpdateOutcome};
