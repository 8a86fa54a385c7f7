//! Evaluation entry domain model.
//!
//! An [`EvaluationEntry`] is a working copy of a log entry submitted into the
//! review pipeline. It is scored independently by the model pass and by a human
//! reviewer, and may be re-submitted once per entry to start another review
//! cycle. Every entry records the log it ultimately descends from in
//! `root_log_id`, so lineage never has to be recovered from the id string.

use super::error::{EvalConsoleError, Result};
use super::log_entry::{flag, LogEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Human score at or above which a completed entry counts as resolved.
///
/// Scores run 0-5; below this value the issue is still open and the entry sits
/// in the completed-unresolved queue.
pub const RESOLVED_THRESHOLD: Score = Score(3);

/// Display format used for joined/batch dates and date-substring filtering.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between a parent id and the timestamp of a re-submission.
const REVISION_SEPARATOR: &str = "-rev-";

/// Formats a timestamp the way dates are shown and searched.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DATE_DISPLAY_FORMAT).to_string()
}

/// A score on the 0-5 scale, where 0 means "unscored".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// The "not yet scored" value.
    pub const UNSCORED: Self = Self(0);

    /// Highest score on the scale.
    pub const MAX: Self = Self(5);

    /// Creates a score, rejecting values above 5.
    ///
    /// # Errors
    ///
    /// Returns [`EvalConsoleError::InvalidScore`] when `value > 5`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eval_console::domain::Score;
    ///
    /// assert_eq!(Score::new(4).unwrap().value(), 4);
    /// assert!(Score::new(6).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX.0 {
            Err(EvalConsoleError::InvalidScore(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Creates a score, saturating at 5.
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = EvalConsoleError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two scores an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreAxis {
    Model,
    Human,
}

/// Lifecycle state of an evaluation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalStatus {
    /// Waiting for the next batch run.
    Pending,
    /// Answered and model-scored by a batch run.
    Completed,
}

/// One submitted-for-review instance of a question.
///
/// `batch_date` is present exactly when `status` is [`EvalStatus::Completed`];
/// the lifecycle engine is the only code that changes either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationEntry {
    pub id: String,
    /// Id of the log this entry ultimately descends from.
    pub root_log_id: String,
    /// Id of the entry this one was re-submitted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub user_name: String,
    pub content: String,
    pub answer_content: String,
    pub source: String,
    #[serde(with = "flag")]
    pub is_online: bool,
    #[serde(rename = "isFileQA", with = "flag")]
    pub is_file_qa: bool,
    #[serde(with = "flag")]
    pub is_knowledge_base: bool,
    #[serde(with = "flag")]
    pub is_deep_thinking: bool,
    pub joined_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_date: Option<DateTime<Utc>>,
    pub status: EvalStatus,
    pub model_score: Score,
    pub human_score: Score,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub is_re_added: bool,
    /// Message from the most recent failed scoring attempt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Store-assigned incarnation of this id; scoring results must echo it.
    #[serde(default)]
    pub generation: u64,
}

impl EvaluationEntry {
    /// Creates the first-submission entry for a log.
    ///
    /// The entry takes the log's id, starts pending with both scores unscored,
    /// and copies the question and its capability flags.
    #[must_use]
    pub fn from_log(log: &LogEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: log.id.clone(),
            root_log_id: log.id.clone(),
            parent_id: None,
            user_name: log.user_name.clone(),
            content: log.content.clone(),
            answer_content: String::new(),
            source: log.source.clone(),
            is_online: log.is_online,
            is_file_qa: log.is_file_qa,
            is_knowledge_base: log.is_knowledge_base,
            is_deep_thinking: log.is_deep_thinking,
            joined_date: now,
            batch_date: None,
            status: EvalStatus::Pending,
            model_score: Score::UNSCORED,
            human_score: Score::UNSCORED,
            remark: String::new(),
            is_re_added: false,
            last_error: None,
            generation: 0,
        }
    }

    /// Builds a fresh pending descendant of this entry.
    ///
    /// The child id is `<self.id>-rev-<now in millis>`. Review state (answer,
    /// scores, remark, batch date, errors) starts over; the question and
    /// lineage carry across. Does not touch `self`.
    #[must_use]
    pub fn re_submission(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}{REVISION_SEPARATOR}{}", self.id, now.timestamp_millis()),
            root_log_id: self.root_log_id.clone(),
            parent_id: Some(self.id.clone()),
            answer_content: String::new(),
            joined_date: now,
            batch_date: None,
            status: EvalStatus::Pending,
            model_score: Score::UNSCORED,
            human_score: Score::UNSCORED,
            remark: String::new(),
            is_re_added: false,
            last_error: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == EvalStatus::Pending
    }

    /// Completed with a human score at or above [`RESOLVED_THRESHOLD`].
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status == EvalStatus::Completed && self.human_score >= RESOLVED_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn from_log_copies_question_and_starts_pending() {
        let mut log = LogEntry::new("L1", "Alice", "Where is the expense form?");
        log.is_knowledge_base = true;
        log.source = "web".into();

        let entry = EvaluationEntry::from_log(&log, at(1_700_000_000));

        assert_eq!(entry.id, "L1");
        assert_eq!(entry.root_log_id, "L1");
        assert!(entry.parent_id.is_none());
        assert!(entry.is_pending());
        assert!(entry.is_knowledge_base);
        assert!(entry.answer_content.is_empty());
        assert_eq!(entry.model_score, Score::UNSCORED);
    }

    #[test]
    fn re_submission_resets_review_state_and_keeps_root() {
        let log = LogEntry::new("L1", "Alice", "q");
        let mut parent = EvaluationEntry::from_log(&log, at(1_700_000_000));
        parent.status = EvalStatus::Completed;
        parent.batch_date = Some(at(1_700_000_100));
        parent.answer_content = "answer".into();
        parent.human_score = Score::new(4).unwrap();
        parent.remark = "looks fine".into();

        let child = parent.re_submission(at(1_700_000_200));

        assert_eq!(child.id, "L1-rev-1700000200000");
        assert_eq!(child.root_log_id, "L1");
        assert_eq!(child.parent_id.as_deref(), Some("L1"));
        assert!(child.is_pending());
        assert!(child.batch_date.is_none());
        assert!(child.answer_content.is_empty());
        assert!(child.remark.is_empty());
        assert_eq!(child.human_score, Score::UNSCORED);
        assert_eq!(child.content, parent.content);
    }

    #[test]
    fn grandchild_id_extends_child_id() {
        let log = LogEntry::new("L1", "Alice", "q");
        let parent = EvaluationEntry::from_log(&log, at(1));
        let child = parent.re_submission(at(2));
        let grandchild = child.re_submission(at(3));

        assert!(grandchild.id.starts_with(&format!("{}-rev-", child.id)));
        assert_eq!(grandchild.root_log_id, "L1");
    }

    #[test]
    fn resolved_requires_completion_and_threshold() {
        let log = LogEntry::new("L1", "Alice", "q");
        let mut entry = EvaluationEntry::from_log(&log, at(1));
        entry.human_score = Score::new(5).unwrap();
        assert!(!entry.is_resolved(), "pending entries are never resolved");

        entry.status = EvalStatus::Completed;
        entry.human_score = Score::new(2).unwrap();
        assert!(!entry.is_resolved());

        entry.human_score = RESOLVED_THRESHOLD;
        assert!(entry.is_resolved());
    }

    #[test]
    fn score_rejects_values_above_five() {
        assert!(matches!(Score::new(9), Err(EvalConsoleError::InvalidScore(9))));
        assert_eq!(Score::saturating(9), Score::MAX);
        assert!(serde_json::from_str::<Score>("6").is_err());
    }

    #[test]
    fn timestamps_format_for_display() {
        assert_eq!(format_timestamp(&at(0)), "1970-01-01 00:00:00");
    }
}
