//! Eval Console: curation core for evaluation sets built from AI assistant chat logs.
//!
//! Reviewers browse question/answer logs, promote interesting ones into an
//! evaluation set, batch-score the pending entries against an answer
//! generator, grade the results, and re-submit entries that need another
//! round. This crate provides:
//! - An owned entry store for logs and evaluation entries
//! - A lifecycle engine enforcing the membership and lineage invariants
//! - Filtered, sorted queue views recomputed on every read
//! - A pluggable asynchronous scoring backend with a built-in simulator
//! - A line-oriented console (`eval-console` binary) over all of the above

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console runtime (main.rs)                          │  ← stdin commands, tokio
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Command parsing, event handling                  │
//! │  - Action dispatching (scoring)                     │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Lifecycle     │   │ View (view/)  │   │ Scoring       │
//! │ (lifecycle/)  │   │ - Filters     │   │ (scoring/)    │
//! │ - Promote     │   │ - Queues      │   │ - Scorer trait│
//! │ - Batch       │   │ - Counts      │   │ - Concurrency │
//! │ - Re-submit   │   │               │   │ - Simulator   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Store (store/) and Domain (domain/)                │
//! │  - Log and evaluation entries, scores, errors       │
//! │  - Seed ingestion                                   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/), UI (ui/)           │
//! │  - tracing subscriber, OTLP file export             │
//! │  - Plain-text rendering                             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (entries, scores, errors)
//! - [`infrastructure`]: Path resolution
//! - [`lifecycle`]: The only write path for evaluation entries
//! - [`observability`]: tracing setup and OTLP/JSON span export
//! - [`scoring`]: Scoring backend seam and concurrent dispatch
//! - [`store`]: Entry store and seed ingestion
//! - [`ui`]: View models and text rendering
//! - [`view`]: Filtered queue projections
//!
//! # Configuration
//!
//! ```toml
//! seed_path = "/srv/exports/chat_logs.json"
//! data_dir = "~/.local/share/eval-console"
//! trace_level = "debug"
//! trace_export = true
//! trace_max_bytes = 10485760
//! trace_backups = 3
//!
//! [scorer]
//! min_score = 3
//! max_score = 5
//! ```
//!
//! # Examples
//!
//! ```rust
//! use eval_console::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default())?;
//! let first = state.store.logs()[0].id.clone();
//!
//! let (_render, actions) = handle_event(&mut state, &Event::Promote { log_id: first })?;
//! assert!(actions.is_empty());
//! assert_eq!(state.store.evaluations().len(), 1);
//! # Ok::<(), eval_console::EvalConsoleError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod lifecycle;
pub mod observability;
pub mod scoring;
pub mod store;
pub mod ui;
pub mod view;

pub use app::{handle_event, parse_command, Action, AppState, EvalQueue, Event, MainTab};
pub use domain::{EvalConsoleError, EvaluationEntry, LogEntry, Result, Score};

use scoring::ScorerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log feed bundled for demos and for running without a configured seed.
pub const DEMO_SEED: &str = include_str!("../demos/seed_logs.json");

const DEFAULT_TRACE_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_TRACE_BACKUPS: usize = 3;

/// Console configuration.
///
/// Read from a TOML file with [`Config::from_file`]; individual keys can be
/// overridden from `key=value` pairs with [`Config::merge_map`]. Missing keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON log feed to load. `None` uses [`DEMO_SEED`].
    pub seed_path: Option<PathBuf>,

    /// Directory for trace output; `~` is expanded.
    ///
    /// Default: `$HOME/.local/share/eval-console`.
    pub data_dir: Option<String>,

    /// Tracing filter directive used when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Writes spans as OTLP/JSON into `data_dir`. Default: `false`
    pub trace_export: bool,

    /// Size at which the trace file rotates. Default: 10 MiB
    pub trace_max_bytes: u64,

    /// Rotated trace files to keep. Default: 3
    pub trace_backups: usize,

    /// Score range of the simulated backend.
    pub scorer: ScorerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_path: None,
            data_dir: None,
            trace_level: None,
            trace_export: false,
            trace_max_bytes: DEFAULT_TRACE_MAX_BYTES,
            trace_backups: DEFAULT_TRACE_BACKUPS,
            scorer: ScorerConfig::default(),
        }
    }
}

impl Config {
    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// [`EvalConsoleError::Io`] if the file cannot be read,
    /// [`EvalConsoleError::Config`] if it is not valid configuration TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| EvalConsoleError::Config(format!("{}: {e}", path.display())))
    }

    /// Builds a configuration from `key=value` pairs over the defaults.
    ///
    /// # Errors
    ///
    /// See [`Config::merge_map`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use eval_console::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "debug".to_string());
    /// map.insert("scorer.max_score".to_string(), "4".to_string());
    ///
    /// let config = Config::from_map(&map)?;
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert_eq!(config.scorer.max_score, 4);
    /// # Ok::<(), eval_console::EvalConsoleError>(())
    /// ```
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        config.merge_map(map)?;
        Ok(config)
    }

    /// Overrides fields from `key=value` pairs.
    ///
    /// Keys are the TOML field names, with `scorer.` prefixes for the scorer
    /// table. Unknown keys are ignored with a warning. Empty values clear
    /// optional fields.
    ///
    /// # Errors
    ///
    /// [`EvalConsoleError::Config`] if a value does not parse. Fields merged
    /// before the failing key keep their new values.
    pub fn merge_map(&mut self, map: &BTreeMap<String, String>) -> Result<()> {
        let optional = |value: &str| (!value.trim().is_empty()).then(|| value.trim().to_string());

        for (key, value) in map {
            match key.as_str() {
                "seed_path" => self.seed_path = optional(value).map(PathBuf::from),
                "data_dir" => self.data_dir = optional(value),
                "trace_level" => self.trace_level = optional(value),
                "trace_export" => self.trace_export = parse_bool(key, value)?,
                "trace_max_bytes" => self.trace_max_bytes = parse_value(key, value)?,
                "trace_backups" => self.trace_backups = parse_value(key, value)?,
                "scorer.min_score" => self.scorer.min_score = parse_value(key, value)?,
                "scorer.max_score" => self.scorer.max_score = parse_value(key, value)?,
                _ => tracing::warn!(key = %key, "unknown configuration key ignored"),
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EvalConsoleError::Config(format!("{key}: invalid value '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EvalConsoleError::Config(format!("{key}: expected true or false, got '{value}'"))),
    }
}

/// Loads the configured log feed and builds the initial console state.
///
/// # Errors
///
/// Returns the seed loading error if the feed cannot be read or parsed.
///
/// # Example
///
/// ```rust
/// use eval_console::{initialize, Config};
///
/// let state = initialize(&Config::default())?;
/// assert!(!state.store.logs().is_empty());
/// # Ok::<(), eval_console::EvalConsoleError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    let _span = tracing::debug_span!("initialize", seed_path = ?config.seed_path).entered();

    let feed = match &config.seed_path {
        Some(path) => store::load_seed(path)?,
        None => store::parse_seed(DEMO_SEED)?,
    };

    let state = AppState::new(store::EntryStore::new(feed));
    tracing::info!(logs = state.store.logs().len(), "console initialized");
    Ok(state)
}
