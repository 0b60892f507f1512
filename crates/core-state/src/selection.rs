//! Visual selection bounds derived from the anchor and the live cursor.

use core_text::{Position, TextBuffer, grapheme};

use crate::Mode;

/// Normalize `anchor`/`cursor` so `start <= end` (row, then column). In
/// VisualLine mode the selection always covers whole lines: `start.col` is 0
/// and `end.col` is the grapheme count of the end line.
pub fn bounds(anchor: Position, cursor: Position, mode: Mode, buffer: &TextBuffer) -> (Position, Position) {
    let (mut start, mut end) = if cursor < anchor {
        (cursor, anchor)
    } else {
        (anchor, cursor)
    };
    if mode == Mode::VisualLine {
        start.col = 0;
        end.col = buffer.line_len(end.row);
    }
    (start, end)
}

/// Text covered by an inclusive selection: the first line's suffix from
/// `start.col`, full middle lines, and the last line's prefix through
/// `end.col`, joined by `\n`.
pub fn selected_text(buffer: &TextBuffer, start: Position, end: Position) -> String {
    if end.row == start.row {
        let line = buffer.line(start.row);
        return grapheme::slice(line, start.col, end.col + 1).to_string();
    }
    let mut parts = Vec::with_capacity(end.row - start.row + 1);
    let first = buffer.line(start.row);
    parts.push(grapheme::slice(first, start.col, grapheme::count(first)));
    for row in start.row + 1..end.row {
        parts.push(buffer.line(row));
    }
    parts.push(grapheme::slice(buffer.line(end.row), 0, end.col + 1));
    parts.join("\n")
}
