//! Plain-text rendering of the board and task cards.

use crate::model::task::Task;
use crate::view::board::{Board, Column};

/// Collapsed cards show at most this many description characters.
pub const COLLAPSED_DESCRIPTION_CHARS: usize = 60;

const EMPTY_COLUMN_PLACEHOLDER: &str = "No tasks yet";

/// Card display density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardDetail {
    /// Single-line, truncated description.
    #[default]
    Collapsed,
    /// Full description, line breaks preserved.
    Expanded,
}

/// Renders every column in display order.
pub fn render_board(board: &Board<'_>, detail: CardDetail) -> String {
    let mut out = String::new();
    for (index, column) in board.columns().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&render_column(column, detail));
    }
    out
}

/// Renders a column header followed by its cards or the empty placeholder.
pub fn render_column(column: &Column<'_>, detail: CardDetail) -> String {
    let mut out = format!("== {} ({}) ==\n", column.title(), column.count_label());
    if column.is_empty() {
        out.push_str(&format!("  {EMPTY_COLUMN_PLACEHOLDER}\n"));
        return out;
    }
    for task in &column.tasks {
        for line in render_card(task, detail).lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

/// Renders one task card.
pub fn render_card(task: &Task, detail: CardDetail) -> String {
    let mut out = format!(
        "[{}] {}  (id: {})\n",
        task.priority.label(),
        task.title,
        task.id
    );
    if task.description.is_empty() {
        return out;
    }
    match detail {
        CardDetail::Collapsed => {
            let summary = truncate_single_line(&task.description, COLLAPSED_DESCRIPTION_CHARS);
            out.push_str(&format!("    {summary}\n"));
        }
        CardDetail::Expanded => {
            for line in task.description.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    out
}

fn truncate_single_line(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
