//! Console command parsing.
//!
//! Maps one line of user input to an [`Event`]. Lines are split on
//! whitespace and parsed as a clap subcommand. Filter commands edit a single
//! field, so they read the current filters from [`AppState`] and emit the
//! complete updated filter.
//!
//! | Command | Event |
//! |---------|-------|
//! | `logs [normal\|test]` | `ShowLogs` |
//! | `queue [pending\|completed\|resolved]` | `ShowQueue` |
//! | `promote <log-id>` | `Promote` |
//! | `retract <eval-id>` | `Retract` |
//! | `resubmit <eval-id>` | `ReSubmit` |
//! | `score <eval-id> model\|human <0-5>` | `Score` |
//! | `remark <eval-id> [text]` | `Annotate` |
//! | `reclassify <user name>` | `Reclassify` |
//! | `batch` | `RunBatch` |
//! | `logfilter <field> [value]` | `SetLogFilter` |
//! | `evalfilter <field> [value]` | `SetEvalFilter` |
//! | `scorefilter model\|human [0-5\|all]` | `SetScoreFilter` |
//! | `reset logs\|eval` | `ResetLogFilters` / `ResetEvalFilters` |
//! | `quit` | `Quit` |
//!
//! A missing filter value or `all` clears the field. `help` lists the
//! commands.

use super::handler::Event;
use super::modes::EvalQueue;
use super::state::AppState;
use crate::domain::error::{EvalConsoleError, Result};
use crate::domain::{Score, ScoreAxis, UserType};
use crate::view::Choice;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "eval-console", no_binary_name = true, disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
enum ConsoleCommand {
    /// Show the log feed of a user partition
    Logs {
        #[arg(value_enum)]
        partition: Option<Partition>,
    },
    /// Show an evaluation queue
    Queue {
        #[arg(value_enum)]
        queue: Option<Queue>,
    },
    /// Add a log to the evaluation set
    Promote { log_id: String },
    /// Remove an evaluation entry
    Retract { eval_id: String },
    /// Queue a fresh copy of an entry for another round
    Resubmit { eval_id: String },
    /// Set a model or human score
    Score {
        eval_id: String,
        #[arg(value_enum)]
        axis: Axis,
        value: u8,
    },
    /// Set or clear the reviewer remark
    Remark {
        eval_id: String,
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Move every log of a user to the other partition
    Reclassify {
        #[arg(required = true)]
        user_name: Vec<String>,
    },
    /// Score every pending entry
    Batch,
    /// Edit one log view filter
    Logfilter {
        #[arg(value_enum)]
        field: LogField,
        #[arg(allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Edit one queue filter
    Evalfilter {
        #[arg(value_enum)]
        field: EvalField,
        #[arg(allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Filter the completed queue by exact score
    Scorefilter {
        #[arg(value_enum)]
        axis: Axis,
        value: Option<String>,
    },
    /// Clear filters
    Reset {
        #[arg(value_enum)]
        target: ResetTarget,
    },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Partition {
    Normal,
    Test,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Queue {
    Pending,
    Completed,
    Resolved,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Axis {
    Model,
    Human,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogField {
    User,
    Content,
    Dept,
    Source,
    Online,
    #[value(name = "fileqa")]
    FileQa,
    Kb,
    Deep,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EvalField {
    User,
    Content,
    Date,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResetTarget {
    Logs,
    Eval,
}

impl From<Axis> for ScoreAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Model => Self::Model,
            Axis::Human => Self::Human,
        }
    }
}

/// Parses one command line.
///
/// Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`EvalConsoleError::InvalidCommand`] carrying clap's message for
/// unknown commands, missing arguments, or `help`, and
/// [`EvalConsoleError::InvalidScore`] for a score filter outside 0-5.
pub fn parse_command(state: &AppState, line: &str) -> Result<Option<Event>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parsed = CommandLine::try_parse_from(line.split_whitespace())
        .map_err(|e| EvalConsoleError::InvalidCommand(e.to_string().trim_end().to_string()))?;

    let event = match parsed.command {
        ConsoleCommand::Logs { partition } => Event::ShowLogs(match partition {
            None | Some(Partition::Normal) => UserType::Normal,
            Some(Partition::Test) => UserType::Test,
        }),
        ConsoleCommand::Queue { queue } => Event::ShowQueue(match queue {
            None | Some(Queue::Pending) => EvalQueue::Pending,
            Some(Queue::Completed) => EvalQueue::Completed,
            Some(Queue::Resolved) => EvalQueue::Resolved,
        }),
        ConsoleCommand::Promote { log_id } => Event::Promote { log_id },
        ConsoleCommand::Retract { eval_id } => Event::Retract { eval_id },
        ConsoleCommand::Resubmit { eval_id } => Event::ReSubmit { eval_id },
        ConsoleCommand::Score { eval_id, axis, value } => Event::Score {
            eval_id,
            axis: axis.into(),
            value,
        },
        ConsoleCommand::Remark { eval_id, text } => Event::Annotate {
            eval_id,
            remark: text.join(" "),
        },
        ConsoleCommand::Reclassify { user_name } => Event::Reclassify {
            user_name: user_name.join(" "),
        },
        ConsoleCommand::Batch => Event::RunBatch,
        ConsoleCommand::Logfilter { field, value } => log_filter(state, field, filter_value(&value).as_deref())?,
        ConsoleCommand::Evalfilter { field, value } => eval_filter(state, field, filter_value(&value)),
        ConsoleCommand::Scorefilter { axis, value } => score_filter(state, axis, value.as_deref())?,
        ConsoleCommand::Reset { target } => match target {
            ResetTarget::Logs => Event::ResetLogFilters,
            ResetTarget::Eval => Event::ResetEvalFilters,
        },
        ConsoleCommand::Quit => Event::Quit,
    };

    tracing::trace!(event = ?event, "command parsed");
    Ok(Some(event))
}

/// Joins the value words; no words or `all` means "clear".
fn filter_value(words: &[String]) -> Option<String> {
    let value = words.join(" ");
    (!value.is_empty() && !value.eq_ignore_ascii_case("all")).then_some(value)
}

fn parse_flag(value: Option<&str>) -> Result<Choice<bool>> {
    match value {
        None => Ok(Choice::All),
        Some("1" | "yes" | "true") => Ok(Choice::Only(true)),
        Some("0" | "no" | "false") => Ok(Choice::Only(false)),
        Some(other) => Err(EvalConsoleError::InvalidCommand(format!(
            "'{other}' is not a flag value (use 1, 0 or all)"
        ))),
    }
}

fn log_filter(state: &AppState, field: LogField, value: Option<&str>) -> Result<Event> {
    let text = || value.unwrap_or_default().to_string();
    let choice = || value.map_or(Choice::All, |v| Choice::Only(v.to_string()));

    let mut filter = state.log_filter.clone();
    match field {
        LogField::User => filter.user_name = text(),
        LogField::Content => filter.content = text(),
        LogField::Dept => filter.department = choice(),
        LogField::Source => filter.source = choice(),
        LogField::Online => filter.online = parse_flag(value)?,
        LogField::FileQa => filter.file_qa = parse_flag(value)?,
        LogField::Kb => filter.knowledge_base = parse_flag(value)?,
        LogField::Deep => filter.deep_thinking = parse_flag(value)?,
    }
    Ok(Event::SetLogFilter(filter))
}

fn eval_filter(state: &AppState, field: EvalField, value: Option<String>) -> Event {
    let text = value.unwrap_or_default();

    let mut filter = state.eval_filter.clone();
    match field {
        EvalField::User => filter.user_name = text,
        EvalField::Content => filter.content = text,
        EvalField::Date => filter.date = text,
    }
    Event::SetEvalFilter(filter)
}

fn score_filter(state: &AppState, axis: Axis, value: Option<&str>) -> Result<Event> {
    let choice = match value {
        None => Choice::All,
        Some(v) if v.eq_ignore_ascii_case("all") => Choice::All,
        Some(v) => {
            let number = v
                .parse()
                .map_err(|_| EvalConsoleError::InvalidCommand(format!("'{v}' is not a score")))?;
            Choice::Only(Score::new(number)?)
        }
    };

    let mut filter = state.score_filter;
    match axis {
        Axis::Model => filter.model = choice,
        Axis::Human => filter.human = choice,
    }
    Ok(Event::SetScoreFilter(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::LogFilter;

    fn parse(line: &str) -> Result<Option<Event>> {
        parse_command(&AppState::default(), line)
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("   # setup").unwrap().is_none());
    }

    #[test]
    fn parses_lifecycle_commands() {
        assert_eq!(
            parse("promote L1").unwrap(),
            Some(Event::Promote { log_id: "L1".into() })
        );
        assert_eq!(
            parse("score L1 human 4").unwrap(),
            Some(Event::Score {
                eval_id: "L1".into(),
                axis: ScoreAxis::Human,
                value: 4
            })
        );
        assert_eq!(
            parse("remark L1 needs a citation").unwrap(),
            Some(Event::Annotate {
                eval_id: "L1".into(),
                remark: "needs a citation".into()
            })
        );
        assert_eq!(
            parse("reclassify Alice Zhang").unwrap(),
            Some(Event::Reclassify {
                user_name: "Alice Zhang".into()
            })
        );
    }

    #[test]
    fn missing_arguments_are_errors() {
        assert!(matches!(parse("promote"), Err(EvalConsoleError::InvalidCommand(_))));
        assert!(matches!(parse("score L1 human"), Err(EvalConsoleError::InvalidCommand(_))));
        assert!(matches!(parse("frobnicate"), Err(EvalConsoleError::InvalidCommand(_))));
    }

    #[test]
    fn log_filter_edits_one_field() {
        let mut state = AppState::default();
        state.log_filter.content = "vpn".into();

        let event = parse_command(&state, "logfilter online 1").unwrap();

        assert_eq!(
            event,
            Some(Event::SetLogFilter(LogFilter {
                content: "vpn".into(),
                online: Choice::Only(true),
                ..LogFilter::default()
            }))
        );
    }

    #[test]
    fn all_clears_a_filter_field() {
        let mut state = AppState::default();
        state.log_filter.department = Choice::Only("IT".into());

        let Some(Event::SetLogFilter(filter)) = parse_command(&state, "logfilter dept all").unwrap() else {
            panic!("expected SetLogFilter");
        };

        assert_eq!(filter.department, Choice::All);
    }

    #[test]
    fn score_filter_validates_range() {
        assert!(matches!(
            parse("scorefilter model 7"),
            Err(EvalConsoleError::InvalidScore(7))
        ));

        let Some(Event::SetScoreFilter(filter)) = parse("scorefilter human 2").unwrap() else {
            panic!("expected SetScoreFilter");
        };
        assert_eq!(filter.human, Choice::Only(Score::new(2).unwrap()));
    }

    #[test]
    fn multi_word_filter_values_are_joined() {
        let Some(Event::SetEvalFilter(filter)) = parse("evalfilter content travel claim").unwrap() else {
            panic!("expected SetEvalFilter");
        };
        assert_eq!(filter.content, "travel claim");
    }

    #[test]
    fn exit_is_an_alias_for_quit() {
        assert_eq!(parse("exit").unwrap(), Some(Event::Quit));
        assert_eq!(parse("quit").unwrap(), Some(Event::Quit));
    }

    #[test]
    fn defaults_and_bad_choices() {
        assert_eq!(parse("logs").unwrap(), Some(Event::ShowLogs(UserType::Normal)));
        assert_eq!(parse("queue resolved").unwrap(), Some(Event::ShowQueue(EvalQueue::Resolved)));
        assert!(matches!(parse("queue archived"), Err(EvalConsoleError::InvalidCommand(_))));
        assert!(matches!(parse("logfilter colour red"), Err(EvalConsoleError::InvalidCommand(_))));
        assert!(matches!(parse("score L1 human five"), Err(EvalConsoleError::InvalidCommand(_))));
        assert!(matches!(parse("logfilter online maybe"), Err(EvalConsoleError::InvalidCommand(_))));
    }

    #[test]
    fn help_lists_commands() {
        let Err(EvalConsoleError::InvalidCommand(help)) = parse("help") else {
            panic!("expected help text");
        };
        assert!(help.contains("promote"));
        assert!(help.contains("scorefilter"));
    }
}
