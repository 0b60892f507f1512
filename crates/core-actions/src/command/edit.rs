//! Content edits outside the operator grammar: typing in Insert and Replace
//! mode, Insert-mode deletions, `r`, `J` and paste.
//!
//! Every mutation goes through the command's [`EditLog`] so undo can revert
//! it exactly. Edits that grow the content respect the char limit: typed or
//! pasted text is truncated to the remaining room, a paste from the register
//! or a line break that does not fit is skipped.

use core_state::EditorState;
use core_text::{EditLog, Position, grapheme, motion, normalize_line_endings};
use tracing::trace;

use super::ExecStatus;

/// First `n` grapheme clusters of `text`.
fn take_graphemes(text: &str, n: usize) -> &str {
    &text[..grapheme::to_byte_offset(text, n)]
}

pub(super) fn insert_text(text: &str, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let normalized = normalize_line_endings(text);
    let text = match st.remaining_capacity() {
        Some(room) => take_graphemes(&normalized, room),
        None => normalized.as_str(),
    };
    if text.is_empty() {
        trace!(target: "actions.dispatch", op = "insert_text", requested = normalized.len(), "char_limit_reached");
        return ExecStatus::Skipped;
    }
    let at = st.buffer.clamp(st.cursor(), true);
    st.buffer.cursor = log.insert(&mut st.buffer, at, text);
    ExecStatus::Executed
}

/// Replace mode typing: each grapheme overwrites the one under the cursor,
/// or is appended at the line end. Line breaks are inserted, never
/// overwritten.
pub(super) fn overwrite_text(text: &str, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let normalized = normalize_line_endings(text);
    let mut pos = st.buffer.clamp(st.cursor(), true);
    let mut wrote = false;
    for g in grapheme::iter_forward(&normalized, 0).map(|c| c.text) {
        if g != "\n" && pos.col < st.buffer.line_len(pos.row) {
            log.remove(&mut st.buffer, pos, Position::new(pos.row, pos.col + 1));
        } else if !st.has_room_for(1) {
            break;
        }
        pos = log.insert(&mut st.buffer, pos, g);
        wrote = true;
    }
    st.buffer.cursor = pos;
    if wrote {
        ExecStatus::Executed
    } else {
        ExecStatus::Skipped
    }
}

/// Delete the grapheme before the cursor, joining with the previous line at
/// column 0.
pub(super) fn backspace(st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let cursor = st.buffer.clamp(st.cursor(), true);
    if cursor == Position::origin() {
        return ExecStatus::Skipped;
    }
    let start = st.buffer.prev_position(cursor);
    log.remove(&mut st.buffer, start, cursor);
    st.buffer.cursor = start;
    ExecStatus::Executed
}

/// Delete the grapheme under the cursor, joining the next line at line end.
pub(super) fn delete_forward(st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let cursor = st.buffer.clamp(st.cursor(), true);
    let end = st.buffer.next_position(cursor);
    if end == cursor {
        return ExecStatus::Skipped;
    }
    log.remove(&mut st.buffer, cursor, end);
    st.buffer.cursor = cursor;
    ExecStatus::Executed
}

/// `<ctrl+w>`: delete back to the start of the previous word on this line.
/// At column 0 it joins with the previous line like backspace.
pub(super) fn delete_word_before(st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let cursor = st.buffer.clamp(st.cursor(), true);
    if cursor.col == 0 {
        return backspace(st, log);
    }
    let mut start = cursor;
    motion::word_backward(&st.buffer, &mut start, false);
    if start.row < cursor.row {
        start = Position::new(cursor.row, 0);
    }
    log.remove(&mut st.buffer, start, cursor);
    st.buffer.cursor = start;
    ExecStatus::Executed
}

/// `<ctrl+u>`: delete from line start to the cursor.
pub(super) fn delete_to_line_start(st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let cursor = st.buffer.clamp(st.cursor(), true);
    if cursor.col == 0 {
        return ExecStatus::Skipped;
    }
    let start = Position::new(cursor.row, 0);
    log.remove(&mut st.buffer, start, cursor);
    st.buffer.cursor = start;
    ExecStatus::Executed
}

/// `r<g>`: replace the grapheme under the cursor; the cursor stays.
pub(super) fn replace_under(with: &str, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let cursor = st.buffer.clamp(st.cursor(), false);
    if cursor.col >= st.buffer.line_len(cursor.row) {
        return ExecStatus::Skipped;
    }
    log.remove(&mut st.buffer, cursor, Position::new(cursor.row, cursor.col + 1));
    log.insert(&mut st.buffer, cursor, with);
    st.buffer.cursor = cursor;
    ExecStatus::Executed
}

/// `J`: join the next line onto this one, dropping its indentation and
/// separating with one space unless either side is empty or the current
/// line already ends in whitespace.
pub(super) fn join_lines(st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let row = st.cursor().row;
    if row >= st.buffer.last_row() {
        return ExecStatus::Skipped;
    }
    let len = st.buffer.line_len(row);
    let next_indent = st.buffer.first_non_blank(row + 1);
    let next_blank = st.buffer.line(row + 1).trim().is_empty();
    let ends_blank = st
        .buffer
        .line(row)
        .chars()
        .last()
        .is_none_or(char::is_whitespace);
    let join_at = Position::new(row, len);
    let tail = if next_blank {
        Position::new(row + 1, st.buffer.line_len(row + 1))
    } else {
        Position::new(row + 1, next_indent)
    };
    log.remove(&mut st.buffer, join_at, tail);
    if !ends_blank && !next_blank {
        log.insert(&mut st.buffer, join_at, " ");
    }
    st.buffer.cursor = join_at;
    st.clamp_cursor();
    ExecStatus::Executed
}

/// `p` / `P` from the register. Line-wise text opens new lines below or
/// above; character-wise text goes after or at the cursor and the cursor
/// lands on its last grapheme.
pub(super) fn paste(before: bool, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    let reg = st.register.clone();
    if reg.text.is_empty() && !reg.linewise {
        return ExecStatus::Skipped;
    }
    let needed = grapheme::count(&reg.text) + usize::from(reg.linewise);
    if !st.has_room_for(needed) {
        trace!(target: "actions.dispatch", op = "paste", needed, "char_limit_reached");
        return ExecStatus::Skipped;
    }
    let cursor = st.buffer.clamp(st.cursor(), false);
    if reg.linewise {
        let row = if before {
            log.insert(&mut st.buffer, Position::new(cursor.row, 0), &format!("{}\n", reg.text));
            cursor.row
        } else {
            let end = Position::new(cursor.row, st.buffer.line_len(cursor.row));
            log.insert(&mut st.buffer, end, &format!("\n{}", reg.text));
            cursor.row + 1
        };
        st.buffer.cursor = Position::new(row, st.buffer.first_non_blank(row));
    } else {
        let at = if before {
            cursor
        } else {
            Position::new(cursor.row, (cursor.col + 1).min(st.buffer.line_len(cursor.row)))
        };
        let end = log.insert(&mut st.buffer, at, &reg.text);
        st.buffer.cursor = st.buffer.prev_position(end);
    }
    st.clamp_cursor();
    ExecStatus::Executed
}
