//! Application state and view model computation.
//!
//! [`AppState`] owns the [`EntryStore`] together with the transient console
//! state: active tab and queue, filters, and the report of the last batch.
//! Views are never cached; `compute_viewmodel` asks the projector on every
//! render, so a lifecycle operation is visible immediately.
//!
//! # Example
//!
//! ```rust
//! use eval_console::app::AppState;
//! use eval_console::domain::LogEntry;
//! use eval_console::store::EntryStore;
//!
//! let store = EntryStore::new(vec![LogEntry::new("L1", "Alice", "How do I file expenses?")]);
//! let state = AppState::new(store);
//! let viewmodel = state.compute_viewmodel(100);
//! assert_eq!(viewmodel.rows.len(), 1);
//! ```

use super::modes::{EvalQueue, MainTab};
use crate::domain::{format_timestamp, EvaluationEntry, LogEntry, UserType};
use crate::lifecycle::BatchReport;
use crate::store::EntryStore;
use crate::ui::viewmodel::{ConsoleViewModel, DisplayRow, EmptyState, FooterInfo, HeaderInfo, TabBadge};
use crate::view::{self, EvalFilter, LogFilter, ScoreFilter};

const MIN_TEXT_WIDTH: usize = 16;
const MAX_TEXT_WIDTH: usize = 60;

const LOG_COLUMNS: [&str; 7] = ["ID", "USER", "DEPT", "SOURCE", "FLAGS", "QUESTION", "EVAL"];
const PENDING_COLUMNS: [&str; 5] = ["ID", "USER", "QUESTION", "JOINED", "STATUS"];
const SCORED_COLUMNS: [&str; 8] = ["ID", "USER", "QUESTION", "ANSWER", "MODEL", "HUMAN", "BATCH", "REMARK"];

/// Central application state container.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Every log and evaluation entry.
    pub store: EntryStore,

    pub active_tab: MainTab,

    /// Queue shown when the evaluation tab is active.
    pub eval_queue: EvalQueue,

    /// Log view predicates, including the user partition.
    pub log_filter: LogFilter,

    /// Name, content and date predicates shared by the three queues.
    pub eval_filter: EvalFilter,

    /// Score predicates for the completed queue.
    pub score_filter: ScoreFilter,

    /// Report of the most recently committed batch.
    pub last_batch: Option<BatchReport>,

    /// Set between `RunBatch` and `BatchScored`; a second run is refused.
    pub batch_in_flight: bool,

    /// One-line outcome of the last command.
    pub notice: Option<String>,
}

impl AppState {
    /// Creates console state over a loaded store, showing normal-user logs.
    #[must_use]
    pub fn new(store: EntryStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Switches to the log tab of a partition.
    pub fn show_logs(&mut self, user_type: UserType) {
        self.active_tab = MainTab::Logs;
        self.log_filter.user_type = user_type;
    }

    /// Switches to a queue of the evaluation tab.
    pub fn show_queue(&mut self, queue: EvalQueue) {
        self.active_tab = MainTab::Evaluation;
        self.eval_queue = queue;
    }

    /// Computes the view model for a console of the given width.
    ///
    /// Text columns share the width left over by the fixed columns and are
    /// truncated to fit.
    #[must_use]
    pub fn compute_viewmodel(&self, cols: usize) -> ConsoleViewModel {
        let _span = tracing::debug_span!("compute_viewmodel",
            tab = ?self.active_tab,
            queue = ?self.eval_queue
        )
        .entered();

        let text_width = (cols / 3).clamp(MIN_TEXT_WIDTH, MAX_TEXT_WIDTH);

        let (columns, rows): (Vec<&'static str>, Vec<DisplayRow>) = match self.active_tab {
            MainTab::Logs => (
                LOG_COLUMNS.to_vec(),
                view::log_view(&self.store, &self.log_filter)
                    .into_iter()
                    .map(|log| Self::log_row(log, text_width))
                    .collect(),
            ),
            MainTab::Evaluation => match self.eval_queue {
                EvalQueue::Pending => (
                    PENDING_COLUMNS.to_vec(),
                    view::pending_queue(&self.store, &self.eval_filter)
                        .into_iter()
                        .map(|entry| Self::pending_row(entry, text_width))
                        .collect(),
                ),
                EvalQueue::Completed => (
                    SCORED_COLUMNS.to_vec(),
                    view::completed_queue(&self.store, &self.eval_filter, &self.score_filter)
                        .into_iter()
                        .map(|entry| Self::scored_row(entry, text_width))
                        .collect(),
                ),
                EvalQueue::Resolved => (
                    SCORED_COLUMNS.to_vec(),
                    view::resolved_queue(&self.store, &self.eval_filter)
                        .into_iter()
                        .map(|entry| Self::scored_row(entry, text_width))
                        .collect(),
                ),
            },
        };

        let empty_state = rows.is_empty().then(|| self.compute_empty_state());

        ConsoleViewModel {
            header: self.compute_header(rows.len()),
            columns,
            rows,
            footer: self.compute_footer(),
            empty_state,
            notice: self.notice.clone(),
        }
    }

    fn log_row(log: &LogEntry, text_width: usize) -> DisplayRow {
        let flag = |on: bool, letter: char| if on { letter } else { '-' };
        let flags: String = [
            flag(log.is_online, 'O'),
            flag(log.is_file_qa, 'F'),
            flag(log.is_knowledge_base, 'K'),
            flag(log.is_deep_thinking, 'D'),
        ]
        .iter()
        .collect();

        DisplayRow {
            id: log.id.clone(),
            cells: vec![
                log.id.clone(),
                log.user_name.clone(),
                log.department.clone(),
                log.source.clone(),
                flags,
                truncate(&log.content, text_width),
                if log.is_added_to_eval { "yes" } else { "" }.to_string(),
            ],
        }
    }

    fn pending_row(entry: &EvaluationEntry, text_width: usize) -> DisplayRow {
        let status = entry
            .last_error
            .as_deref()
            .map_or_else(|| "waiting".to_string(), |e| truncate(&format!("failed: {e}"), text_width));

        DisplayRow {
            id: entry.id.clone(),
            cells: vec![
                entry.id.clone(),
                entry.user_name.clone(),
                truncate(&entry.content, text_width),
                format_timestamp(&entry.joined_date),
                status,
            ],
        }
    }

    fn scored_row(entry: &EvaluationEntry, text_width: usize) -> DisplayRow {
        DisplayRow {
            id: entry.id.clone(),
            cells: vec![
                entry.id.clone(),
                entry.user_name.clone(),
                truncate(&entry.content, text_width),
                truncate(&entry.answer_content, text_width),
                entry.model_score.to_string(),
                entry.human_score.to_string(),
                entry.batch_date.as_ref().map(format_timestamp).unwrap_or_default(),
                truncate(&entry.remark, text_width),
            ],
        }
    }

    fn compute_header(&self, shown: usize) -> HeaderInfo {
        match self.active_tab {
            MainTab::Logs => {
                let partition = match self.log_filter.user_type {
                    UserType::Normal => "normal users",
                    UserType::Test => "test users",
                };
                let total = self
                    .store
                    .logs()
                    .iter()
                    .filter(|log| log.user_type == self.log_filter.user_type)
                    .count();
                HeaderInfo {
                    title: format!(" Logs ({partition}) {shown}/{total} "),
                    tabs: vec![],
                }
            }
            MainTab::Evaluation => {
                let counts = view::queue_counts(&self.store);
                let tabs = EvalQueue::ALL
                    .iter()
                    .map(|&queue| TabBadge {
                        label: queue.label(),
                        count: match queue {
                            EvalQueue::Pending => counts.pending,
                            EvalQueue::Completed => counts.completed,
                            EvalQueue::Resolved => counts.resolved,
                        },
                        is_active: queue == self.eval_queue,
                    })
                    .collect();
                HeaderInfo {
                    title: format!(" Evaluation: {} ({shown}) ", self.eval_queue.label()),
                    tabs,
                }
            }
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let commands = match (self.active_tab, self.eval_queue) {
            (MainTab::Logs, _) => {
                "promote <id>  reclassify <user>  logfilter <field> [value]  reset logs  queue <name>  quit"
            }
            (MainTab::Evaluation, EvalQueue::Pending) => {
                "batch  retract <id>  evalfilter <field> [value]  reset eval  logs <normal|test>  quit"
            }
            (MainTab::Evaluation, EvalQueue::Completed) => {
                "score <id> <model|human> <0-5>  remark <id> <text>  resubmit <id>  retract <id>  scorefilter <axis> <n|all>  quit"
            }
            (MainTab::Evaluation, EvalQueue::Resolved) => {
                "score <id> <model|human> <0-5>  remark <id> <text>  retract <id>  evalfilter <field> [value]  quit"
            }
        };

        FooterInfo {
            commands: commands.to_string(),
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let (message, subtitle) = match self.active_tab {
            MainTab::Logs if self.store.logs().is_empty() => {
                ("No logs loaded", "Set seed_path in the configuration file")
            }
            MainTab::Logs => ("No logs match the current filters", "Use `reset logs` to clear them"),
            MainTab::Evaluation => match self.eval_queue {
                EvalQueue::Pending => ("No pending entries", "Promote logs to start an evaluation"),
                EvalQueue::Completed => ("No entries awaiting review", "Run `batch` to score pending entries"),
                EvalQueue::Resolved => ("No resolved entries", "A human score of 3 or more resolves an entry"),
            },
        };

        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }
}

/// Shortens text to `max_chars` characters on one line, marking cuts with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    let single_line: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let kept: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::promote;
    use chrono::Utc;

    fn state() -> AppState {
        let mut test_log = LogEntry::new("T1", "Tester", "synthetic check");
        test_log.user_type = UserType::Test;
        AppState::new(EntryStore::new(vec![
            LogEntry::new("L1", "Alice", "How do I reset my VPN token?"),
            LogEntry::new("L2", "Bob", "Where is the expense form?"),
            test_log,
        ]))
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("报销流程需要哪些材料和审批", 8), "报销流程需...");
        assert_eq!(truncate("short", 8), "short");
        assert_eq!(truncate("two\nlines", 20), "two lines");
    }

    #[test]
    fn log_tab_shows_partition_only() {
        let state = state();

        let vm = state.compute_viewmodel(120);

        assert_eq!(vm.rows.len(), 2);
        assert_eq!(vm.columns.len(), vm.rows[0].cells.len());
        assert!(vm.header.title.contains("2/2"));
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn empty_queue_has_empty_state() {
        let mut state = state();
        state.show_queue(EvalQueue::Resolved);

        let vm = state.compute_viewmodel(120);

        assert!(vm.rows.is_empty());
        assert_eq!(vm.empty_state.unwrap().message, "No resolved entries");
    }

    #[test]
    fn evaluation_header_counts_queues() {
        let mut state = state();
        promote(&mut state.store, "L1", Utc::now());
        promote(&mut state.store, "L2", Utc::now());
        state.show_queue(EvalQueue::Pending);

        let vm = state.compute_viewmodel(120);

        let pending = vm.header.tabs.iter().find(|t| t.label == "Pending").unwrap();
        assert_eq!(pending.count, 2);
        assert!(pending.is_active);
        assert_eq!(vm.rows[0].cells[4], "waiting");
    }

    #[test]
    fn promoted_log_is_marked() {
        let mut state = state();
        promote(&mut state.store, "L2", Utc::now());

        let vm = state.compute_viewmodel(120);

        let row = vm.rows.iter().find(|r| r.id == "L2").unwrap();
        assert_eq!(row.cells[6], "yes");
    }
}
