//! Text rendering of the console view model.
//!
//! The renderer writes into a `String` instead of stdout so the runtime owns
//! the output stream and tests can inspect what would be shown.
//!
//! # Layout
//!
//! ```text
//!  Evaluation: Completed (2)
//!  [Pending 0] [*Completed 2] [Resolved 1]
//!
//! ID  USER   QUESTION ...
//! L1  Alice  How do I ...
//!
//! > batch done: 2 completed
//! score <id> <model|human> <0-5>  ...
//! ```

use crate::app::AppState;
use crate::ui::viewmodel::{ConsoleViewModel, DisplayRow};
use std::fmt::Write;

const COLUMN_GAP: &str = "  ";

/// Renders the current state for a console of `cols` columns.
#[must_use]
pub fn render(state: &AppState, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(cols);
    render_viewmodel(&viewmodel)
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &ConsoleViewModel) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", vm.header.title);
    if !vm.header.tabs.is_empty() {
        let tabs: Vec<String> = vm
            .header
            .tabs
            .iter()
            .map(|tab| {
                let marker = if tab.is_active { "*" } else { "" };
                format!("[{marker}{} {}]", tab.label, tab.count)
            })
            .collect();
        let _ = writeln!(out, " {}", tabs.join(" "));
    }
    out.push('\n');

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "  {}", empty.message);
        let _ = writeln!(out, "  {}", empty.subtitle);
    } else {
        render_table(&mut out, &vm.columns, &vm.rows);
    }

    out.push('\n');
    if let Some(notice) = &vm.notice {
        let _ = writeln!(out, "> {notice}");
    }
    let _ = writeln!(out, "{}", vm.footer.commands);
    out
}

fn render_table(out: &mut String, columns: &[&str], rows: &[DisplayRow]) {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<&str> = columns.to_vec();
    write_line(out, &header, &widths);
    for row in rows {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        write_line(out, &cells, &widths);
    }
}

fn write_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{EmptyState, FooterInfo, HeaderInfo, TabBadge};

    fn viewmodel(rows: Vec<DisplayRow>) -> ConsoleViewModel {
        ConsoleViewModel {
            header: HeaderInfo {
                title: " Evaluation: Pending (1) ".into(),
                tabs: vec![TabBadge {
                    label: "Pending",
                    count: 1,
                    is_active: true,
                }],
            },
            columns: vec!["ID", "USER"],
            rows,
            footer: FooterInfo { commands: "quit".into() },
            empty_state: None,
            notice: Some("L1 added to evaluation".into()),
        }
    }

    #[test]
    fn columns_are_aligned() {
        let vm = viewmodel(vec![
            DisplayRow {
                id: "L1".into(),
                cells: vec!["L1".into(), "Alice".into()],
            },
            DisplayRow {
                id: "L10".into(),
                cells: vec!["L10".into(), "Bo".into()],
            },
        ]);

        let out = render_viewmodel(&vm);

        assert!(out.contains("ID   USER\n"));
        assert!(out.contains("L1   Alice\n"));
        assert!(out.contains("L10  Bo\n"));
        assert!(out.contains("[*Pending 1]"));
        assert!(out.contains("> L1 added to evaluation"));
    }

    #[test]
    fn empty_state_replaces_table() {
        let mut vm = viewmodel(vec![]);
        vm.empty_state = Some(EmptyState {
            message: "No pending entries".into(),
            subtitle: "Promote logs to start an evaluation".into(),
        });

        let out = render_viewmodel(&vm);

        assert!(out.contains("No pending entries"));
        assert!(!out.contains("ID"));
    }
}
