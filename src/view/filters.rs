//! Filter predicates for the derived views.
//!
//! Every filter field is independent and all of them are combined with AND.
//! Text fields match case-insensitive substrings and an empty string matches
//! everything; [`Choice::All`] bypasses an exact-match field.

use crate::domain::{format_timestamp, EvaluationEntry, LogEntry, Score, UserType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An exact-match filter value, or the "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    /// True for [`Choice::All`] or an equal value.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

/// Case-insensitive substring test; an empty needle always matches.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Predicates for the log view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    /// Partition to show; always applied.
    pub user_type: UserType,
    pub user_name: String,
    pub content: String,
    pub department: Choice<String>,
    pub source: Choice<String>,
    pub online: Choice<bool>,
    pub file_qa: Choice<bool>,
    pub knowledge_base: Choice<bool>,
    pub deep_thinking: Choice<bool>,
}

impl LogFilter {
    /// A filter showing every log of one partition.
    #[must_use]
    pub fn partition(user_type: UserType) -> Self {
        Self {
            user_type,
            ..Self::default()
        }
    }

    /// Clears every predicate except the partition.
    pub fn reset(&mut self) {
        *self = Self::partition(self.user_type);
    }

    #[must_use]
    pub fn matches(&self, log: &LogEntry) -> bool {
        log.user_type == self.user_type
            && contains_ignore_case(&log.user_name, &self.user_name)
            && contains_ignore_case(&log.content, &self.content)
            && self.department.admits(&log.department)
            && self.source.admits(&log.source)
            && self.online.admits(&log.is_online)
            && self.file_qa.admits(&log.is_file_qa)
            && self.knowledge_base.admits(&log.is_knowledge_base)
            && self.deep_thinking.admits(&log.is_deep_thinking)
    }
}

/// Text predicates shared by the three evaluation queues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalFilter {
    pub user_name: String,
    pub content: String,
    /// Substring of the displayed date (`YYYY-MM-DD HH:MM:SS`).
    pub date: String,
}

impl EvalFilter {
    /// Matches name and content, and `date` against the given timestamp.
    #[must_use]
    pub fn matches(&self, entry: &EvaluationEntry, date: &DateTime<Utc>) -> bool {
        contains_ignore_case(&entry.user_name, &self.user_name)
            && contains_ignore_case(&entry.content, &self.content)
            && (self.date.is_empty() || contains_ignore_case(&format_timestamp(date), &self.date))
    }
}

/// Exact score predicates for the completed-unresolved queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreFilter {
    pub model: Choice<Score>,
    pub human: Choice<Score>,
}

impl ScoreFilter {
    #[must_use]
    pub fn matches(&self, entry: &EvaluationEntry) -> bool {
        self.model.admits(&entry.model_score) && self.human.admits(&entry.human_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> LogEntry {
        let mut log = LogEntry::new("L1", "Alice Zhang", "How do I Reset my VPN?");
        log.department = "IT".into();
        log.source = "web".into();
        log.is_online = true;
        log
    }

    #[test]
    fn text_match_ignores_case() {
        assert!(contains_ignore_case("Alice Zhang", "zhang"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Alice", "bob"));
    }

    #[test]
    fn log_filter_combines_predicates() {
        let log = log();
        let mut filter = LogFilter {
            user_name: "ALICE".into(),
            content: "reset".into(),
            department: Choice::Only("IT".into()),
            online: Choice::Only(true),
            ..LogFilter::default()
        };
        assert!(filter.matches(&log));

        filter.file_qa = Choice::Only(true);
        assert!(!filter.matches(&log));
    }

    #[test]
    fn log_filter_always_applies_partition() {
        let log = log();
        assert!(!LogFilter::partition(UserType::Test).matches(&log));
        assert!(LogFilter::partition(UserType::Normal).matches(&log));
    }

    #[test]
    fn reset_keeps_partition() {
        let mut filter = LogFilter {
            user_type: UserType::Test,
            content: "vpn".into(),
            source: Choice::Only("app".into()),
            ..LogFilter::default()
        };

        filter.reset();

        assert_eq!(filter, LogFilter::partition(UserType::Test));
    }

    #[test]
    fn department_is_exact_not_substring() {
        let filter = LogFilter {
            department: Choice::Only("I".into()),
            ..LogFilter::default()
        };
        assert!(!filter.matches(&log()));
    }
}
