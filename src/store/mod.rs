//! Entry store holding log and evaluation entries.
//!
//! The [`EntryStore`] is the single owner of every record the console works
//! with. It performs no validation beyond structural shape: keeping the
//! `is_added_to_eval` flags consistent with evaluation lineage is the job of
//! [`crate::lifecycle`], which is why mutating accessors are crate-private.
//!
//! # Modules
//!
//! - `seed`: Parsing of the inbound log feed (JSON)

pub mod seed;

pub use seed::{load_seed, parse_seed};

use crate::domain::{EvaluationEntry, LogEntry};
use std::collections::{HashMap, HashSet};

/// Owned collection of log entries and evaluation entries.
///
/// Logs keep their ingestion order, which is the display order of the log
/// view. Evaluation order carries no meaning; each queue view sorts its own
/// rows.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    logs: Vec<LogEntry>,
    log_index: HashMap<String, usize>,
    evaluations: Vec<EvaluationEntry>,
    next_generation: u64,
}

impl EntryStore {
    /// Creates a store from an ingested log feed.
    ///
    /// Duplicate ids keep the first record. Since a fresh store has no
    /// evaluation entries, any `is_added_to_eval` flag set by the feed is
    /// cleared so the membership invariant holds from the start.
    ///
    /// # Examples
    ///
    /// ```
    /// use eval_console::domain::LogEntry;
    /// use eval_console::store::EntryStore;
    ///
    /// let store = EntryStore::new(vec![
    ///     LogEntry::new("L1", "Alice", "first question"),
    ///     LogEntry::new("L2", "Bob", "second question"),
    /// ]);
    /// assert_eq!(store.logs().len(), 2);
    /// assert!(store.log("L2").is_some());
    /// ```
    #[must_use]
    pub fn new(feed: Vec<LogEntry>) -> Self {
        let _span = tracing::debug_span!("entry_store_new", feed_len = feed.len()).entered();

        let mut logs = Vec::with_capacity(feed.len());
        let mut log_index = HashMap::with_capacity(feed.len());

        for mut log in feed {
            if log_index.contains_key(&log.id) {
                tracing::warn!(log_id = %log.id, "duplicate log id in feed, keeping first record");
                continue;
            }
            if log.is_added_to_eval {
                tracing::warn!(log_id = %log.id, "feed marked log as added to evaluation, clearing flag");
                log.is_added_to_eval = false;
            }
            log_index.insert(log.id.clone(), logs.len());
            logs.push(log);
        }

        tracing::debug!(log_count = logs.len(), "entry store ready");

        Self {
            logs,
            log_index,
            evaluations: Vec::new(),
            next_generation: 1,
        }
    }

    /// All logs in ingestion order.
    #[must_use]
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    #[must_use]
    pub fn log(&self, id: &str) -> Option<&LogEntry> {
        self.log_index.get(id).map(|&pos| &self.logs[pos])
    }

    pub(crate) fn log_mut(&mut self, id: &str) -> Option<&mut LogEntry> {
        let pos = *self.log_index.get(id)?;
        self.logs.get_mut(pos)
    }

    pub(crate) fn logs_mut(&mut self) -> impl Iterator<Item = &mut LogEntry> {
        self.logs.iter_mut()
    }

    /// All live evaluation entries, in no particular order.
    #[must_use]
    pub fn evaluations(&self) -> &[EvaluationEntry] {
        &self.evaluations
    }

    #[must_use]
    pub fn evaluation(&self, id: &str) -> Option<&EvaluationEntry> {
        self.evaluations.iter().find(|e| e.id == id)
    }

    pub(crate) fn evaluation_mut(&mut self, id: &str) -> Option<&mut EvaluationEntry> {
        self.evaluations.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn evaluations_mut(&mut self) -> impl Iterator<Item = &mut EvaluationEntry> {
        self.evaluations.iter_mut()
    }

    /// Stores an entry under a fresh generation number. Generations are never
    /// reused, so an id that is retracted and created again gets a new one.
    pub(crate) fn insert_evaluation(&mut self, mut entry: EvaluationEntry) {
        entry.generation = self.next_generation;
        self.next_generation += 1;
        self.evaluations.push(entry);
    }

    pub(crate) fn remove_evaluation(&mut self, id: &str) -> Option<EvaluationEntry> {
        let pos = self.evaluations.iter().position(|e| e.id == id)?;
        Some(self.evaluations.remove(pos))
    }

    /// Whether any live evaluation entry descends from the given log.
    #[must_use]
    pub fn has_live_lineage(&self, root_log_id: &str) -> bool {
        self.evaluations.iter().any(|e| e.root_log_id == root_log_id)
    }

    /// Ids of logs whose `is_added_to_eval` flag disagrees with the live
    /// evaluation lineage. Empty whenever the store is consistent.
    #[must_use]
    pub fn flag_mismatches(&self) -> Vec<&str> {
        let live_roots: HashSet<&str> = self
            .evaluations
            .iter()
            .map(|e| e.root_log_id.as_str())
            .collect();

        self.logs
            .iter()
            .filter(|log| log.is_added_to_eval != live_roots.contains(log.id.as_str()))
            .map(|log| log.id.as_str())
            .collect()
    }

    /// Distinct departments in first-seen order.
    #[must_use]
    pub fn departments(&self) -> Vec<&str> {
        distinct(self.logs.iter().map(|log| log.department.as_str()))
    }

    /// Distinct log sources in first-seen order.
    #[must_use]
    pub fn sources(&self) -> Vec<&str> {
        distinct(self.logs.iter().map(|log| log.source.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| !v.is_empty() && seen.insert(*v)).collect()
}
