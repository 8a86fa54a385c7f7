//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single mutator of [`AppState`]: it applies one
//! event, calls into the lifecycle engine, records a notice describing the
//! outcome, and returns the actions the runtime must carry out.
//!
//! # Event Types
//!
//! - **Navigation**: `ShowLogs`, `ShowQueue`
//! - **Lifecycle**: `Promote`, `Retract`, `ReSubmit`, `Score`, `Annotate`, `Reclassify`
//! - **Batch**: `RunBatch` starts scoring, `BatchScored` commits the results
//! - **Filters**: `SetLogFilter`, `SetEvalFilter`, `SetScoreFilter`, `ResetLogFilters`, `ResetEvalFilters`
//!
//! # Example
//!
//! ```rust
//! use eval_console::app::{handle_event, AppState, Event};
//! use eval_console::domain::LogEntry;
//! use eval_console::store::EntryStore;
//!
//! let mut state = AppState::new(EntryStore::new(vec![LogEntry::new("L1", "Alice", "question")]));
//! let (render, actions) = handle_event(&mut state, &Event::Promote { log_id: "L1".into() })?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), eval_console::EvalConsoleError>(())
//! ```

use super::modes::EvalQueue;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{Score, ScoreAxis, UserType};
use crate::lifecycle::{self, PromoteOutcome, ReSubmitOutcome, RetractOutcome, UpdateOutcome};
use crate::scoring::ScoringResult;
use crate::view::{EvalFilter, LogFilter, ScoreFilter};
use chrono::Utc;

/// Events triggered by console commands or by completed side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Shows the log tab for one user partition.
    ShowLogs(UserType),
    /// Shows one queue of the evaluation tab.
    ShowQueue(EvalQueue),

    /// Adds a log to the evaluation set.
    Promote { log_id: String },
    /// Removes an evaluation entry.
    Retract { eval_id: String },
    /// Re-queues a completed entry as a new lineage-linked entry.
    ReSubmit { eval_id: String },
    /// Sets a model or human score; the value is validated here.
    Score { eval_id: String, axis: ScoreAxis, value: u8 },
    /// Replaces the reviewer remark.
    Annotate { eval_id: String, remark: String },
    /// Moves every log of a user to the other partition.
    ///
    /// The current partition is the one the log tab is showing.
    Reclassify { user_name: String },

    /// Starts scoring every pending entry.
    RunBatch,
    /// Carries settled scoring results back from the runtime.
    BatchScored { results: Vec<ScoringResult> },

    /// Replaces the log predicates. The partition is kept.
    SetLogFilter(LogFilter),
    SetEvalFilter(EvalFilter),
    SetScoreFilter(ScoreFilter),
    /// Clears every log predicate except the partition.
    ResetLogFilters,
    /// Clears the queue predicates and the score predicates.
    ResetEvalFilters,

    /// Ends the session.
    Quit,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The returned flag says whether the view changed and should be re-rendered.
///
/// # Errors
///
/// Returns [`EvalConsoleError::InvalidScore`](crate::EvalConsoleError::InvalidScore)
/// for a score outside 0-5. State is left unchanged in that case.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::ShowLogs(user_type) => {
            state.show_logs(*user_type);
            Ok((true, vec![]))
        }
        Event::ShowQueue(queue) => {
            state.show_queue(*queue);
            Ok((true, vec![]))
        }
        Event::Promote { log_id } => {
            let outcome = lifecycle::promote(&mut state.store, log_id, Utc::now());
            tracing::debug!(log_id = %log_id, outcome = ?outcome, "promote handled");
            state.notice = Some(match outcome {
                PromoteOutcome::Promoted => format!("{log_id} added to evaluation"),
                PromoteOutcome::AlreadyInEvaluation => format!("{log_id} is already in evaluation"),
                PromoteOutcome::UnknownLog => format!("no log with id {log_id}"),
            });
            Ok((true, vec![]))
        }
        Event::Retract { eval_id } => {
            let outcome = lifecycle::retract(&mut state.store, eval_id);
            tracing::debug!(eval_id = %eval_id, outcome = ?outcome, "retract handled");
            state.notice = Some(match outcome {
                RetractOutcome::Retracted { root_released: true } => {
                    format!("{eval_id} removed; its log can be promoted again")
                }
                RetractOutcome::Retracted { root_released: false } => format!("{eval_id} removed"),
                RetractOutcome::NotFound => format!("no evaluation entry with id {eval_id}"),
            });
            Ok((true, vec![]))
        }
        Event::ReSubmit { eval_id } => {
            let outcome = lifecycle::re_submit(&mut state.store, eval_id, Utc::now());
            tracing::debug!(eval_id = %eval_id, outcome = ?outcome, "re-submit handled");
            state.notice = Some(match outcome {
                ReSubmitOutcome::ReSubmitted { new_id } => format!("{eval_id} re-queued as {new_id}"),
                ReSubmitOutcome::AlreadyReSubmitted => format!("{eval_id} was already re-submitted"),
                ReSubmitOutcome::NotFound => format!("no evaluation entry with id {eval_id}"),
            });
            Ok((true, vec![]))
        }
        Event::Score { eval_id, axis, value } => {
            let score = Score::new(*value)?;
            let outcome = lifecycle::score_entry(&mut state.store, eval_id, *axis, score);
            state.notice = Some(update_notice(outcome, eval_id, "score updated"));
            Ok((true, vec![]))
        }
        Event::Annotate { eval_id, remark } => {
            let outcome = lifecycle::annotate(&mut state.store, eval_id, remark);
            state.notice = Some(update_notice(outcome, eval_id, "remark saved"));
            Ok((true, vec![]))
        }
        Event::Reclassify { user_name } => {
            let current = state.log_filter.user_type;
            let changed = lifecycle::reclassify(&mut state.store, user_name, current);
            let target = match current.opposite() {
                UserType::Normal => "normal",
                UserType::Test => "test",
            };
            state.notice = Some(format!("{changed} log(s) of {user_name} moved to {target} users"));
            Ok((true, vec![]))
        }
        Event::RunBatch => {
            if state.batch_in_flight {
                tracing::debug!("batch already running, ignoring");
                return Ok((false, vec![]));
            }

            let requests = lifecycle::scoring_requests(&state.store);
            if requests.is_empty() {
                state.notice = Some("nothing to score: the pending queue is empty".to_string());
                state.show_queue(EvalQueue::Completed);
                return Ok((true, vec![]));
            }

            tracing::info!(request_count = requests.len(), "batch started");
            state.batch_in_flight = true;
            state.notice = Some(format!("scoring {} entries...", requests.len()));
            Ok((true, vec![Action::ScoreBatch { requests }]))
        }
        Event::BatchScored { results } => {
            let report = lifecycle::apply_scoring(&mut state.store, results.clone(), Utc::now());
            state.batch_in_flight = false;
            state.notice = Some(if report.failed.is_empty() {
                format!("batch done: {} completed", report.completed.len())
            } else {
                format!(
                    "batch done: {} completed, {} failed and stay pending",
                    report.completed.len(),
                    report.failed.len()
                )
            });
            state.last_batch = Some(report);
            state.show_queue(EvalQueue::Completed);
            Ok((true, vec![]))
        }
        Event::SetLogFilter(filter) => {
            state.log_filter = LogFilter {
                user_type: state.log_filter.user_type,
                ..filter.clone()
            };
            Ok((true, vec![]))
        }
        Event::SetEvalFilter(filter) => {
            state.eval_filter.clone_from(filter);
            Ok((true, vec![]))
        }
        Event::SetScoreFilter(filter) => {
            state.score_filter = *filter;
            Ok((true, vec![]))
        }
        Event::ResetLogFilters => {
            state.log_filter.reset();
            Ok((true, vec![]))
        }
        Event::ResetEvalFilters => {
            state.eval_filter = EvalFilter::default();
            state.score_filter = ScoreFilter::default();
            Ok((true, vec![]))
        }
        Event::Quit => Ok((false, vec![Action::Quit])),
    }
}

fn update_notice(outcome: UpdateOutcome, eval_id: &str, done: &str) -> String {
    match outcome {
        UpdateOutcome::Updated => format!("{eval_id}: {done}"),
        UpdateOutcome::NotFound => format!("no evaluation entry with id {eval_id}"),
    }
}
