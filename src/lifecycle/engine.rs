//! Single-entry lifecycle transitions.
//!
//! Each function takes the store by mutable reference, runs to completion, and
//! leaves the store consistent: a log's `is_added_to_eval` flag is true exactly
//! when some live evaluation entry has that log as its `root_log_id`.

use super::outcome::{PromoteOutcome, ReSubmitOutcome, RetractOutcome, UpdateOutcome};
use crate::domain::{EvaluationEntry, Score, ScoreAxis, UserType};
use crate::store::EntryStore;
use chrono::{DateTime, Utc};

/// Moves a log into the pending evaluation queue.
///
/// Submit-once: a log that already has a live evaluation entry is left alone.
///
/// # Examples
///
/// ```
/// use eval_console::domain::LogEntry;
/// use eval_console::lifecycle::{promote, PromoteOutcome};
/// use eval_console::store::EntryStore;
///
/// let mut store = EntryStore::new(vec![LogEntry::new("L1", "Alice", "q")]);
/// let now = chrono::Utc::now();
///
/// assert_eq!(promote(&mut store, "L1", now), PromoteOutcome::Promoted);
/// assert_eq!(promote(&mut store, "L1", now), PromoteOutcome::AlreadyInEvaluation);
/// assert_eq!(store.evaluations().len(), 1);
/// ```
pub fn promote(store: &mut EntryStore, log_id: &str, now: DateTime<Utc>) -> PromoteOutcome {
    let _span = tracing::debug_span!("promote", log_id = %log_id).entered();

    let Some(log) = store.log_mut(log_id) else {
        tracing::debug!("unknown log id");
        return PromoteOutcome::UnknownLog;
    };

    if log.is_added_to_eval {
        tracing::debug!("log already in evaluation");
        return PromoteOutcome::AlreadyInEvaluation;
    }

    log.is_added_to_eval = true;
    let entry = EvaluationEntry::from_log(log, now);
    store.insert_evaluation(entry);

    tracing::info!(log_id = %log_id, "log promoted to evaluation");
    PromoteOutcome::Promoted
}

/// Removes an evaluation entry.
///
/// When no other live entry shares the removed entry's root log, the log's
/// `is_added_to_eval` flag is cleared so it can be promoted again.
pub fn retract(store: &mut EntryStore, eval_id: &str) -> RetractOutcome {
    let _span = tracing::debug_span!("retract", eval_id = %eval_id).entered();

    let Some(removed) = store.remove_evaluation(eval_id) else {
        tracing::debug!("no evaluation entry with this id");
        return RetractOutcome::NotFound;
    };

    let root_released = !store.has_live_lineage(&removed.root_log_id);
    if root_released {
        if let Some(log) = store.log_mut(&removed.root_log_id) {
            log.is_added_to_eval = false;
        }
    }

    tracing::info!(
        eval_id = %eval_id,
        root_log_id = %removed.root_log_id,
        root_released,
        "evaluation entry retracted"
    );
    RetractOutcome::Retracted { root_released }
}

/// Creates a fresh pending descendant of an evaluation entry.
///
/// An entry can be re-submitted once; the descendant is itself re-submittable.
/// The parent's status is not checked.
pub fn re_submit(store: &mut EntryStore, eval_id: &str, now: DateTime<Utc>) -> ReSubmitOutcome {
    let _span = tracing::debug_span!("re_submit", eval_id = %eval_id).entered();

    let Some(parent) = store.evaluation_mut(eval_id) else {
        return ReSubmitOutcome::NotFound;
    };

    if parent.is_re_added {
        tracing::debug!("entry already re-submitted");
        return ReSubmitOutcome::AlreadyReSubmitted;
    }

    let child = parent.re_submission(now);
    parent.is_re_added = true;
    let new_id = child.id.clone();
    store.insert_evaluation(child);

    tracing::info!(parent_id = %eval_id, new_id = %new_id, "evaluation entry re-submitted");
    ReSubmitOutcome::ReSubmitted { new_id }
}

/// Sets the model or human score of an entry. No other field changes.
pub fn score_entry(store: &mut EntryStore, eval_id: &str, axis: ScoreAxis, value: Score) -> UpdateOutcome {
    let Some(entry) = store.evaluation_mut(eval_id) else {
        tracing::debug!(eval_id = %eval_id, "score update for unknown entry");
        return UpdateOutcome::NotFound;
    };

    match axis {
        ScoreAxis::Model => entry.model_score = value,
        ScoreAxis::Human => entry.human_score = value,
    }

    tracing::debug!(eval_id = %eval_id, axis = ?axis, score = value.value(), "score updated");
    UpdateOutcome::Updated
}

/// Replaces the remark of an entry.
pub fn annotate(store: &mut EntryStore, eval_id: &str, remark: &str) -> UpdateOutcome {
    let Some(entry) = store.evaluation_mut(eval_id) else {
        return UpdateOutcome::NotFound;
    };

    remark.clone_into(&mut entry.remark);
    tracing::debug!(eval_id = %eval_id, remark_len = remark.len(), "remark updated");
    UpdateOutcome::Updated
}

/// Moves every log of a user to the other partition.
///
/// Matches by user name, not id, so all of that user's logs move together.
/// Returns the number of logs changed.
pub fn reclassify(store: &mut EntryStore, user_name: &str, current_type: UserType) -> usize {
    let next = current_type.opposite();
    let mut changed = 0;

    for log in store.logs_mut().filter(|log| log.user_name == user_name) {
        log.user_type = next;
        changed += 1;
    }

    tracing::info!(user_name = %user_name, to = ?next, changed, "user reclassified");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EvalStatus, LogEntry};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn store() -> EntryStore {
        let mut test_log = LogEntry::new("L3", "Carol", "third");
        test_log.user_type = UserType::Test;
        EntryStore::new(vec![
            LogEntry::new("L1", "Alice", "first"),
            LogEntry::new("L2", "Alice", "second"),
            test_log,
        ])
    }

    #[test]
    fn promote_unknown_log_changes_nothing() {
        let mut store = store();
        assert_eq!(promote(&mut store, "nope", at(1)), PromoteOutcome::UnknownLog);
        assert!(store.evaluations().is_empty());
    }

    #[test]
    fn promote_sets_flag_and_creates_pending_entry() {
        let mut store = store();

        promote(&mut store, "L1", at(10));

        let entry = store.evaluation("L1").unwrap();
        assert_eq!(entry.status, EvalStatus::Pending);
        assert_eq!(entry.joined_date, at(10));
        assert!(store.log("L1").unwrap().is_added_to_eval);
        assert!(store.flag_mismatches().is_empty());
    }

    #[test]
    fn retract_missing_id_is_noop() {
        let mut store = store();
        promote(&mut store, "L1", at(1));

        assert_eq!(retract(&mut store, "L9"), RetractOutcome::NotFound);
        assert_eq!(store.evaluations().len(), 1);
    }

    #[test]
    fn retract_keeps_flag_while_siblings_remain() {
        let mut store = store();
        promote(&mut store, "L1", at(1));
        let ReSubmitOutcome::ReSubmitted { new_id } = re_submit(&mut store, "L1", at(2)) else {
            panic!("expected re-submission");
        };

        assert_eq!(
            retract(&mut store, "L1"),
            RetractOutcome::Retracted { root_released: false }
        );
        assert!(store.log("L1").unwrap().is_added_to_eval);

        assert_eq!(
            retract(&mut store, &new_id),
            RetractOutcome::Retracted { root_released: true }
        );
        assert!(!store.log("L1").unwrap().is_added_to_eval);
        assert!(store.flag_mismatches().is_empty());
    }

    #[test]
    fn retract_then_promote_again() {
        let mut store = store();
        promote(&mut store, "L1", at(1));
        retract(&mut store, "L1");

        assert_eq!(promote(&mut store, "L1", at(5)), PromoteOutcome::Promoted);
        assert_eq!(store.evaluation("L1").unwrap().joined_date, at(5));
    }

    #[test]
    fn re_submit_is_blocked_after_first_use() {
        let mut store = store();
        promote(&mut store, "L1", at(1));
        re_submit(&mut store, "L1", at(2));
        let before = store.evaluations().to_vec();

        assert_eq!(re_submit(&mut store, "L1", at(3)), ReSubmitOutcome::AlreadyReSubmitted);
        assert_eq!(store.evaluations(), before.as_slice());
    }

    #[test]
    fn descendants_are_independently_re_submittable() {
        let mut store = store();
        promote(&mut store, "L1", at(1));
        let ReSubmitOutcome::ReSubmitted { new_id: child } = re_submit(&mut store, "L1", at(2)) else {
            panic!("expected re-submission");
        };

        let outcome = re_submit(&mut store, &child, at(3));

        let ReSubmitOutcome::ReSubmitted { new_id: grandchild } = outcome else {
            panic!("expected re-submission of child");
        };
        assert!(grandchild.starts_with(&format!("{child}-rev-")));
        assert_eq!(store.evaluation(&grandchild).unwrap().root_log_id, "L1");
        assert_eq!(store.evaluations().len(), 3);
    }

    #[test]
    fn score_and_annotate_touch_only_their_field() {
        let mut store = store();
        promote(&mut store, "L1", at(1));
        let before = store.evaluation("L1").unwrap().clone();

        score_entry(&mut store, "L1", ScoreAxis::Human, Score::new(2).unwrap());
        annotate(&mut store, "L1", "answer misses the deadline");

        let after = store.evaluation("L1").unwrap();
        assert_eq!(after.human_score.value(), 2);
        assert_eq!(after.model_score, before.model_score);
        assert_eq!(after.remark, "answer misses the deadline");
        assert_eq!(after.status, before.status);
        assert_eq!(
            score_entry(&mut store, "L9", ScoreAxis::Model, Score::MAX),
            UpdateOutcome::NotFound
        );
    }

    #[test]
    fn reclassify_moves_every_log_of_the_user() {
        let mut store = store();

        assert_eq!(reclassify(&mut store, "Alice", UserType::Normal), 2);

        assert!(store
            .logs()
            .iter()
            .filter(|l| l.user_name == "Alice")
            .all(|l| l.user_type == UserType::Test));
        assert_eq!(store.log("L3").unwrap().user_type, UserType::Test);
    }
}
