//! Mode transitions and selection adjustments.

use core_state::{EditorState, Mode};
use core_text::{EditLog, Position};
use tracing::trace;

use super::{ExecStatus, InsertEntry};
use crate::text_object::TextObjectKind;

pub(super) fn enter(mode: Mode, st: &mut EditorState) -> ExecStatus {
    let from = st.mode;
    st.set_mode(mode);
    trace!(target: "actions.dispatch", from = %from, to = %mode, "mode_switch");
    ExecStatus::Executed
}

pub(super) fn enter_insert(entry: InsertEntry, st: &mut EditorState) -> ExecStatus {
    let cursor = st.cursor();
    let len = st.buffer.line_len(cursor.row);
    st.buffer.cursor.col = match entry {
        InsertEntry::Before => cursor.col,
        InsertEntry::After => (cursor.col + 1).min(len),
        InsertEntry::LineStart => st.buffer.first_non_blank(cursor.row),
        InsertEntry::LineEnd => len,
    };
    enter(Mode::Insert, st)
}

pub(super) fn toggle_visual(target: Mode, st: &mut EditorState) -> ExecStatus {
    if st.mode == target {
        enter(Mode::Normal, st)
    } else {
        enter(target, st)
    }
}

/// Leave Insert, Replace or a visual mode. Leaving Insert or Replace steps
/// the cursor back onto the last typed grapheme.
pub(super) fn exit_to_normal(st: &mut EditorState) -> ExecStatus {
    if st.mode == Mode::Normal {
        return ExecStatus::Skipped;
    }
    if st.mode.allows_past_end() {
        let col = &mut st.buffer.cursor.col;
        *col = col.saturating_sub(1);
    }
    enter(Mode::Normal, st)
}

/// `o` / `O`: open an empty line below or above and start inserting there.
pub(super) fn open_line(above: bool, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    if !st.has_room_for(1) {
        trace!(target: "actions.dispatch", op = "open_line", "char_limit_reached");
        return ExecStatus::Skipped;
    }
    let row = st.cursor().row.min(st.buffer.last_row());
    let target = if above {
        log.insert(&mut st.buffer, Position::new(row, 0), "\n");
        Position::new(row, 0)
    } else {
        let end = Position::new(row, st.buffer.line_len(row));
        log.insert(&mut st.buffer, end, "\n")
    };
    st.buffer.cursor = target;
    enter(Mode::Insert, st)
}

/// Visual `o`: move the cursor to the other end of the selection.
pub(super) fn visual_swap(st: &mut EditorState) -> ExecStatus {
    let Some(anchor) = st.visual_anchor else {
        return ExecStatus::Skipped;
    };
    st.visual_anchor = Some(st.cursor());
    st.buffer.cursor = anchor;
    st.clamp_cursor();
    ExecStatus::Executed
}

/// `viw`, `va(`, ...: select a text object charwise. When nothing is found
/// the selection starts at the cursor (from Normal) or is left alone.
pub(super) fn select_object(object: TextObjectKind, inner: bool, st: &mut EditorState) -> ExecStatus {
    match object.find_bounds(&st.buffer, st.cursor(), inner) {
        Some(span) if !span.is_empty() => {
            st.visual_anchor = Some(span.start);
            st.buffer.cursor = span.end;
            st.mode = Mode::Visual;
            st.clamp_cursor();
            ExecStatus::Executed
        }
        Some(span) => {
            st.buffer.cursor = span.start;
            enter(Mode::Visual, st)
        }
        None if st.mode == Mode::Normal => enter(Mode::Visual, st),
        None => ExecStatus::Skipped,
    }
}
