//! Application layer coordinating state, events, and actions.
//!
//! Sits between the console runtime (main.rs) and the lifecycle, view, and
//! scoring layers.
//!
//! # Architecture
//!
//! ```text
//! Command line → Event → handle_event → State mutation → Actions → Side effects
//!                             ↑                                        ↓
//!                             └──────── BatchScored (scoring results) ─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`commands`]: Parsing of console command lines into events
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Tab and queue selection types
//! - [`state`]: Application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use eval_console::app::{handle_event, AppState, Event};
//! use eval_console::app::modes::EvalQueue;
//!
//! let mut state = AppState::default();
//! let (render, _actions) = handle_event(&mut state, &Event::ShowQueue(EvalQueue::Pending))?;
//! assert!(render);
//! # Ok::<(), eval_console::EvalConsoleError>(())
//! ```

pub mod actions;
pub mod commands;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use commands::parse_command;
pub use handler::{handle_event, Event};
pub use modes::{EvalQueue, MainTab};
pub use state::AppState;
