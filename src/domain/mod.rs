//! Domain layer for the evaluation console.
//!
//! Core record types and error definitions, independent of storage, scoring
//! backends or presentation.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`log_entry`]: Ingested chat log records and user partitions
//! - [`evaluation`]: Evaluation entries, scores, and lifecycle status
//!
//! # Examples
//!
//! ```
//! use eval_console::domain::{EvaluationEntry, LogEntry};
//!
//! let log = LogEntry::new("L1", "Alice", "How do I file a travel claim?");
//! let entry = EvaluationEntry::from_log(&log, chrono::Utc::now());
//! assert_eq!(entry.root_log_id, "L1");
//! ```

pub mod error;
pub mod evaluation;
pub mod log_entry;

pub use error::{EvalConsoleError, Result};
pub use evaluation::{
    format_timestamp, EvalStatus, EvaluationEntry, Score, ScoreAxis, DATE_DISPLAY_FORMAT,
    RESOLVED_THRESHOLD,
};
pub use log_entry::{LogEntry, UserType};
