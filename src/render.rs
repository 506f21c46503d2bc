//! Terminal rendering of annotated buffers.
//!
//! Layout only: which gutter marker a line gets comes entirely from the
//! buffer's change map. Colors are left to the terminal/pager downstream.

use crate::models::LineChange;
use crate::patch::TextBuffer;

fn gutter(change: Option<LineChange>) -> char {
    match change {
        Some(LineChange::Added) => '+',
        Some(LineChange::Deleted) => '-',
        _ => ' ',
    }
}

/// Two panes, row for row. Callers pass aligned buffers when lockstep rows
/// matter; with plain buffers the panes simply run out at different rows.
pub fn side_by_side(left: &TextBuffer, right: &TextBuffer, pane_width: usize) -> String {
    let rows = left.line_count().max(right.line_count());
    let mut out = String::new();

    for i in 0..rows {
        let lg = gutter(left.change(i));
        let rg = gutter(right.change(i));
        let l = left.line(i).unwrap_or("");
        let r = right.line(i).unwrap_or("");
        out.push_str(&format!(
            "{lg} {:<width$.width$} │ {rg} {r}\n",
            l,
            width = pane_width
        ));
    }

    out
}

/// One pane with a change gutter.
pub fn single_pane(buffer: &TextBuffer) -> String {
    let mut out = String::new();
    for i in 0..buffer.line_count() {
        let g = gutter(buffer.change(i));
        out.push_str(&format!("{g} {}\n", buffer.line(i).unwrap_or("")));
    }
    out
}
