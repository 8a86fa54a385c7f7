//! Text rendering layer.
//!
//! ```text
//! AppState → compute_viewmodel → ConsoleViewModel → render → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable console state
//! - [`renderer`]: Table layout of a view model as plain text

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{ConsoleViewModel, DisplayRow, EmptyState, FooterInfo, HeaderInfo, TabBadge};
