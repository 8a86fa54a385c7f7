//! Derived views over the entry store.
//!
//! Four pure queries recomputed on every call; nothing is cached, so a view
//! can never be stale. Sorting is stable, so entries with equal timestamps
//! keep their store order.

use super::filters::{EvalFilter, LogFilter, ScoreFilter};
use crate::domain::{EvalStatus, EvaluationEntry, LogEntry, RESOLVED_THRESHOLD};
use crate::store::EntryStore;
use chrono::{DateTime, Utc};

/// Unfiltered queue sizes, for tab badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub pending: usize,
    pub completed: usize,
    pub resolved: usize,
}

/// Logs of the filter's partition that pass every predicate, in store order.
#[must_use]
pub fn log_view<'a>(store: &'a EntryStore, filter: &LogFilter) -> Vec<&'a LogEntry> {
    let _span = tracing::trace_span!("log_view", total_logs = store.logs().len()).entered();

    store.logs().iter().filter(|log| filter.matches(log)).collect()
}

/// Pending entries, newest joined first. The date filter applies to the
/// joined date.
#[must_use]
pub fn pending_queue<'a>(store: &'a EntryStore, filter: &EvalFilter) -> Vec<&'a EvaluationEntry> {
    let mut rows: Vec<&EvaluationEntry> = store
        .evaluations()
        .iter()
        .filter(|e| e.status == EvalStatus::Pending)
        .filter(|e| filter.matches(e, &e.joined_date))
        .collect();

    rows.sort_by(|a, b| b.joined_date.cmp(&a.joined_date));
    rows
}

/// Completed entries whose human score is below the pass threshold, newest
/// batch first. The date filter applies to the batch date.
#[must_use]
pub fn completed_queue<'a>(
    store: &'a EntryStore,
    filter: &EvalFilter,
    scores: &ScoreFilter,
) -> Vec<&'a EvaluationEntry> {
    let mut rows: Vec<&EvaluationEntry> = store
        .evaluations()
        .iter()
        .filter(|e| e.status == EvalStatus::Completed && e.human_score < RESOLVED_THRESHOLD)
        .filter(|e| filter.matches(e, batch_date(e)))
        .filter(|e| scores.matches(e))
        .collect();

    sort_by_batch_date(&mut rows);
    rows
}

/// Completed entries whose human score meets the pass threshold, newest
/// batch first.
#[must_use]
pub fn resolved_queue<'a>(store: &'a EntryStore, filter: &EvalFilter) -> Vec<&'a EvaluationEntry> {
    let mut rows: Vec<&EvaluationEntry> = store
        .evaluations()
        .iter()
        .filter(|e| e.is_resolved())
        .filter(|e| filter.matches(e, batch_date(e)))
        .collect();

    sort_by_batch_date(&mut rows);
    rows
}

/// Sizes of the three queues with no filters applied.
#[must_use]
pub fn queue_counts(store: &EntryStore) -> QueueCounts {
    store
        .evaluations()
        .iter()
        .fold(QueueCounts::default(), |mut counts, e| {
            match e.status {
                EvalStatus::Pending => counts.pending += 1,
                EvalStatus::Completed if e.is_resolved() => counts.resolved += 1,
                EvalStatus::Completed => counts.completed += 1,
            }
            counts
        })
}

// Completed entries always carry a batch date; fall back to the joined date
// rather than dropping a row if one ever does not.
fn batch_date(entry: &EvaluationEntry) -> &DateTime<Utc> {
    entry.batch_date.as_ref().unwrap_or(&entry.joined_date)
}

fn sort_by_batch_date(rows: &mut [&EvaluationEntry]) {
    rows.sort_by(|a, b| batch_date(b).cmp(batch_date(a)));
}
