//! Batch processing of pending evaluation entries.
//!
//! A batch run moves every pending entry to completed. It happens in two
//! steps so that scoring, the only slow part, can run outside the store:
//!
//! 1. [`scoring_requests`] snapshots the pending entries as requests.
//! 2. [`apply_scoring`] commits all settled results in one synchronous pass.
//!
//! An entry therefore never appears completed before its whole update is
//! written. [`batch_process`] chains both steps around a [`Scorer`].
//!
//! A failed request leaves its entry pending with `last_error` set. The next
//! batch asks the backend again from scratch; nothing from a failed attempt
//! is reused.

use super::outcome::BatchReport;
use crate::domain::EvalStatus;
use crate::scoring::{score_all, Scorer, ScoringError, ScoringRequest, ScoringResult};
use crate::store::EntryStore;
use chrono::{DateTime, Utc};

/// Builds one scoring request per pending entry.
#[must_use]
pub fn scoring_requests(store: &EntryStore) -> Vec<ScoringRequest> {
    store
        .evaluations()
        .iter()
        .filter(|entry| entry.is_pending())
        .map(ScoringRequest::for_entry)
        .collect()
}

/// Commits settled scoring results.
///
/// A result applies only to the entry incarnation it was requested for.
/// Results for entries that were retracted, recreated under the same id, or
/// are no longer pending are skipped, so completed entries never regress and
/// stale replies are harmless.
pub fn apply_scoring(store: &mut EntryStore, results: Vec<ScoringResult>, now: DateTime<Utc>) -> BatchReport {
    let _span = tracing::debug_span!("apply_scoring", result_count = results.len()).entered();

    let mut report = BatchReport::default();

    for result in results {
        let live = store
            .evaluation_mut(&result.eval_id)
            .filter(|e| e.is_pending() && e.generation == result.generation);
        let Some(entry) = live else {
            tracing::debug!(
                eval_id = %result.eval_id,
                generation = result.generation,
                "entry gone, recreated or no longer pending, skipping result"
            );
            report.skipped.push(result.eval_id);
            continue;
        };

        let outcome = result.outcome.and_then(|scored| {
            if scored.answer.trim().is_empty() {
                Err(ScoringError::EmptyAnswer)
            } else {
                Ok(scored)
            }
        });

        match outcome {
            Ok(scored) => {
                entry.answer_content = scored.answer;
                entry.model_score = scored.model_score;
                entry.status = EvalStatus::Completed;
                entry.batch_date = Some(now);
                entry.last_error = None;
                report.completed.push(result.eval_id);
            }
            Err(e) => {
                let message = e.to_string();
                entry.last_error = Some(message.clone());
                report.failed.push((result.eval_id, message));
            }
        }
    }

    tracing::info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        "batch committed"
    );
    report
}

/// Runs a complete batch: request, score concurrently, commit.
///
/// With nothing pending the store is left untouched and the report is empty.
pub async fn batch_process(store: &mut EntryStore, scorer: &dyn Scorer, now: DateTime<Utc>) -> BatchReport {
    let requests = {
        let _span = tracing::debug_span!("batch_process").entered();
        scoring_requests(store)
    };

    if requests.is_empty() {
        tracing::debug!("no pending entries, batch skipped");
        return BatchReport::default();
    }

    let results = score_all(scorer, &requests).await;
    apply_scoring(store, results, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogEntry, Score};
    use crate::lifecycle::{promote, retract};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn store_with_pending(ids: &[&str]) -> EntryStore {
        let logs = ids.iter().map(|id| LogEntry::new(*id, "Alice", "question")).collect();
        let mut store = EntryStore::new(logs);
        for id in ids {
            promote(&mut store, id, at(1));
        }
        store
    }

    fn request(store: &EntryStore, id: &str) -> ScoringRequest {
        ScoringRequest::for_entry(store.evaluation(id).unwrap())
    }

    #[test]
    fn requests_cover_only_pending_entries() {
        let mut store = store_with_pending(&["L1", "L2"]);
        let l1 = request(&store, "L1");
        apply_scoring(&mut store, vec![ScoringResult::success(&l1, "answer", Score::MAX)], at(2));

        let requests = scoring_requests(&store);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].eval_id, "L2");
    }

    #[test]
    fn success_completes_entry() {
        let mut store = store_with_pending(&["L1"]);
        let l1 = request(&store, "L1");

        let report = apply_scoring(
            &mut store,
            vec![ScoringResult::success(&l1, "generated", Score::new(4).unwrap())],
            at(50),
        );

        let entry = store.evaluation("L1").unwrap();
        assert_eq!(report.completed, vec!["L1".to_string()]);
        assert_eq!(entry.status, EvalStatus::Completed);
        assert_eq!(entry.batch_date, Some(at(50)));
        assert_eq!(entry.answer_content, "generated");
        assert_eq!(entry.model_score.value(), 4);
    }

    #[test]
    fn failure_keeps_entry_pending_with_error() {
        let mut store = store_with_pending(&["L1", "L2"]);
        let (l1, l2) = (request(&store, "L1"), request(&store, "L2"));

        let report = apply_scoring(
            &mut store,
            vec![
                ScoringResult::failure(&l1, ScoringError::Backend("quota exceeded".into())),
                ScoringResult::success(&l2, "fine", Score::MAX),
            ],
            at(5),
        );

        let failed = store.evaluation("L1").unwrap();
        assert!(failed.is_pending());
        assert!(failed.batch_date.is_none());
        assert!(failed.last_error.as_deref().unwrap().contains("quota exceeded"));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.completed, vec!["L2".to_string()]);
    }

    #[test]
    fn empty_answer_counts_as_failure() {
        let mut store = store_with_pending(&["L1"]);
        let l1 = request(&store, "L1");

        let report = apply_scoring(&mut store, vec![ScoringResult::success(&l1, "  ", Score::MAX)], at(5));

        assert!(store.evaluation("L1").unwrap().is_pending());
        assert_eq!(report.failed[0].1, ScoringError::EmptyAnswer.to_string());
    }

    #[test]
    fn later_success_clears_previous_error() {
        let mut store = store_with_pending(&["L1"]);
        let l1 = request(&store, "L1");
        apply_scoring(
            &mut store,
            vec![ScoringResult::failure(&l1, ScoringError::Backend("down".into()))],
            at(5),
        );

        apply_scoring(&mut store, vec![ScoringResult::success(&l1, "ok", Score::MAX)], at(6));

        assert!(store.evaluation("L1").unwrap().last_error.is_none());
    }

    #[test]
    fn stale_results_are_skipped() {
        let mut store = store_with_pending(&["L1", "L2"]);
        let (l1, l2) = (request(&store, "L1"), request(&store, "L2"));
        apply_scoring(&mut store, vec![ScoringResult::success(&l2, "first", Score::MAX)], at(2));
        retract(&mut store, "L1");

        let report = apply_scoring(
            &mut store,
            vec![
                ScoringResult::success(&l1, "late", Score::MAX),
                ScoringResult::success(&l2, "second", Score::new(3).unwrap()),
            ],
            at(3),
        );

        assert_eq!(report.skipped, vec!["L1".to_string(), "L2".to_string()]);
        assert!(report.is_empty());
        let completed = store.evaluation("L2").unwrap();
        assert_eq!(completed.answer_content, "first");
        assert_eq!(completed.batch_date, Some(at(2)));
    }

    #[test]
    fn result_for_a_retracted_entry_does_not_complete_its_replacement() {
        let mut store = store_with_pending(&["L1"]);
        let in_flight = scoring_requests(&store);
        retract(&mut store, "L1");
        promote(&mut store, "L1", at(2));

        let report = apply_scoring(
            &mut store,
            vec![ScoringResult::success(&in_flight[0], "stale answer", Score::MAX)],
            at(3),
        );

        let replacement = store.evaluation("L1").unwrap();
        assert!(replacement.is_pending());
        assert!(replacement.answer_content.is_empty());
        assert_eq!(report.skipped, vec!["L1".to_string()]);
        assert_ne!(replacement.generation, in_flight[0].generation);
    }

    #[test]
    fn generations_are_never_reused() {
        let mut store = store_with_pending(&["L1", "L2"]);
        let first = store.evaluation("L1").unwrap().generation;
        retract(&mut store, "L1");
        promote(&mut store, "L1", at(2));

        let mut generations: Vec<u64> = store.evaluations().iter().map(|e| e.generation).collect();
        generations.push(first);
        generations.sort_unstable();
        generations.dedup();

        assert_eq!(generations.len(), 3);
    }
}
