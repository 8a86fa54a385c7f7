//! View model types representing renderable console state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready text.
//!
//! # Example
//!
//! ```rust
//! use eval_console::ui::viewmodel::{ConsoleViewModel, DisplayRow, FooterInfo, HeaderInfo};
//!
//! let vm = ConsoleViewModel {
//!     header: HeaderInfo { title: "Logs (normal users)".to_string(), tabs: vec![] },
//!     columns: vec!["ID", "USER"],
//!     rows: vec![DisplayRow { id: "L1".to_string(), cells: vec!["L1".into(), "Alice".into()] }],
//!     footer: FooterInfo { commands: "quit".to_string() },
//!     empty_state: None,
//!     notice: None,
//! };
//! assert_eq!(vm.rows.len(), 1);
//! ```

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleViewModel {
    /// Title and tab badges.
    pub header: HeaderInfo,

    /// Column titles; every row has one cell per column.
    pub columns: Vec<&'static str>,

    /// Table rows in display order.
    pub rows: Vec<DisplayRow>,

    /// Command hints for the current tab.
    pub footer: FooterInfo,

    /// Set when the current view has no rows.
    pub empty_state: Option<EmptyState>,

    /// Outcome of the last command, if it produced one.
    pub notice: Option<String>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Id of the underlying log or evaluation entry.
    pub id: String,

    /// Pre-formatted cell text.
    pub cells: Vec<String>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Queue tabs with their unfiltered sizes. Empty on the log tab.
    pub tabs: Vec<TabBadge>,
}

/// A queue tab label with its entry count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabBadge {
    pub label: &'static str,
    pub count: usize,
    pub is_active: bool,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub commands: String,
}

/// Message shown in place of an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No pending entries").
    pub message: String,

    /// Secondary hint (e.g., "Promote logs to start an evaluation").
    pub subtitle: String,
}
