//! Console runtime for the evaluation console.
//!
//! Reads one command per line from stdin, feeds it through the library's
//! event handler, executes the returned actions, and prints the rendered
//! view after every change.
//!
//! # Usage
//!
//! ```text
//! eval-console [--config CONFIG.toml] [KEY=VALUE ...]
//! ```
//!
//! `KEY=VALUE` arguments override the configuration file, e.g.
//! `trace_level=debug` or `scorer.min_score=1`. The config path can also come
//! from `EVAL_CONSOLE_CONFIG`.
//!
//! # Architecture
//!
//! ```text
//! stdin line ─▶ parse_command ─▶ Event ─▶ handle_event ─▶ Actions
//!                                             ▲              │
//!                                             │   ScoreBatch │ (awaited on tokio)
//!                                             └─ BatchScored ┘
//! ```
//!
//! Scoring is the only asynchronous step. It runs on a current-thread tokio
//! runtime while the loop waits, so there is never more than one mutator.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use eval_console::scoring::{score_all, SimulatedScorer};
use eval_console::{handle_event, initialize, parse_command, Action, AppState, Config, Event};
use tokio::io::{AsyncBufReadExt, BufReader};

const RENDER_WIDTH: usize = 120;

/// Evaluation console over a log feed
#[derive(Debug, Parser)]
#[command(name = "eval-console")]
#[command(about = "Curate and score evaluation sets from assistant chat logs", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "EVAL_CONSOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Configuration overrides, applied after the file
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    if key.trim().is_empty() {
        return Err(format!("missing key in '{arg}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

struct Console {
    app: AppState,
    scorer: SimulatedScorer,
}

impl Console {
    /// Applies one event and every action it produces. Returns `false` once
    /// the console should stop.
    async fn dispatch(&mut self, event: Event) -> eval_console::Result<bool> {
        let mut pending = vec![event];
        let mut render = false;

        while let Some(event) = pending.pop() {
            let (changed, actions) = handle_event(&mut self.app, &event)?;
            render |= changed;

            for action in actions {
                match action {
                    Action::Quit => return Ok(false),
                    Action::ScoreBatch { requests } => {
                        let results = score_all(&self.scorer, &requests).await;
                        pending.push(Event::BatchScored { results });
                    }
                }
            }
        }

        if render {
            print!("{}", eval_console::ui::render(&self.app, RENDER_WIDTH));
        }
        Ok(true)
    }
}

fn load_config(args: Args) -> eval_console::Result<Config> {
    let mut config = match args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let overrides: BTreeMap<String, String> = args.overrides.into_iter().collect();
    config.merge_map(&overrides)?;
    Ok(config)
}

async fn run(args: Args) -> eval_console::Result<()> {
    let config = load_config(args)?;
    eval_console::observability::init_tracing(&config);

    let mut console = Console {
        app: initialize(&config)?,
        scorer: SimulatedScorer::new(config.scorer),
    };
    print!("{}", eval_console::ui::render(&console.app, RENDER_WIDTH));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match parse_command(&console.app, &line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match console.dispatch(event).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{e}"),
        }
    }

    tracing::info!("console closed");
    Ok(())
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("eval-console: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
