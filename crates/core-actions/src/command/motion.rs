//! Cursor motions, and the ranges they cover when an operator is pending.
//!
//! Plain motions delegate to `core_text::motion` and then clamp for the
//! active mode. Operator ranges classify each motion:
//! * exclusive: `h l w b W B 0 ^ $` (end position not included)
//! * inclusive: `e E`
//! * linewise: `j k gg G`
//!
//! `dw`/`cw` never cross the line break, and `cw` on a non-blank changes to
//! the end of the current word only.

use core_state::EditorState;
use core_text::grapheme::{self, CharClass};
use core_text::{Position, TextBuffer, motion};
use tracing::trace;

use super::operator::Range;
use super::{ExecStatus, MotionKind, Operator};

/// Move the cursor. `Skipped` when it did not move.
pub(super) fn apply(kind: MotionKind, st: &mut EditorState) -> ExecStatus {
    let before = st.cursor();
    let past_end = st.mode.allows_past_end();
    let mut pos = st.buffer.clamp(before, past_end);
    let buf = &st.buffer;
    match kind {
        MotionKind::Left => motion::left(buf, &mut pos),
        MotionKind::Right => motion::right(buf, &mut pos, past_end),
        MotionKind::Up => st.sticky_col = motion::up(buf, &mut pos, st.sticky_col),
        MotionKind::Down => st.sticky_col = motion::down(buf, &mut pos, st.sticky_col),
        MotionKind::WordForward { big } => motion::word_forward(buf, &mut pos, big),
        MotionKind::WordBackward { big } => motion::word_backward(buf, &mut pos, big),
        MotionKind::WordEnd { big } => motion::word_end(buf, &mut pos, big),
        MotionKind::LineStart => motion::line_start(buf, &mut pos),
        MotionKind::FirstNonBlank => motion::first_non_blank(buf, &mut pos),
        MotionKind::LineEnd => motion::line_end(buf, &mut pos),
        MotionKind::BufferStart => motion::buffer_start(buf, &mut pos),
        MotionKind::BufferEnd => motion::buffer_end(buf, &mut pos),
    }
    st.buffer.cursor = pos;
    st.clamp_cursor();
    let after = st.cursor();
    if after == before {
        return ExecStatus::Skipped;
    }
    trace!(target: "actions.dispatch", motion = ?kind, from_row = before.row, from_col = before.col, to_row = after.row, to_col = after.col, "motion");
    ExecStatus::Executed
}

/// Last column of the same-class run starting at `pos`.
fn run_end(buf: &TextBuffer, pos: Position, big: bool) -> usize {
    let line = buf.line(pos.row);
    let Some(class) = grapheme::at(line, pos.col).map(|g| grapheme::classify(g, big)) else {
        return pos.col;
    };
    grapheme::iter_forward(line, pos.col)
        .take_while(|c| grapheme::classify(c.text, big) == class)
        .last()
        .map_or(pos.col, |c| c.index)
}

fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Range covered by `op` applied over `kind` from the cursor. `None` when
/// the range is empty.
pub(super) fn operator_range(kind: MotionKind, op: Operator, st: &EditorState) -> Option<Range> {
    let buf = &st.buffer;
    let from = buf.clamp(st.cursor(), true);
    let mut to = from;
    let chars = match kind {
        MotionKind::Up | MotionKind::Down | MotionKind::BufferStart | MotionKind::BufferEnd => {
            match kind {
                MotionKind::Up => {
                    motion::up(buf, &mut to, None);
                }
                MotionKind::Down => {
                    motion::down(buf, &mut to, None);
                }
                MotionKind::BufferStart => motion::buffer_start(buf, &mut to),
                _ => motion::buffer_end(buf, &mut to),
            }
            if kind.is_vertical() && to.row == from.row {
                return None;
            }
            let (first, last) = ordered(from, to);
            return Some(Range::Lines {
                first: first.row,
                last: last.row,
            });
        }
        MotionKind::WordEnd { big } => {
            motion::word_end(buf, &mut to, big);
            let (start, end) = ordered(from, to);
            (start, buf.next_position(end))
        }
        MotionKind::WordForward { big } => {
            let on_word = grapheme::at(buf.line(from.row), from.col)
                .is_some_and(|g| grapheme::classify(g, big) != CharClass::Blank);
            if op == Operator::Change && on_word {
                (from, Position::new(from.row, run_end(buf, from, big) + 1))
            } else {
                motion::word_forward(buf, &mut to, big);
                if to.row > from.row {
                    to = Position::new(from.row, buf.line_len(from.row));
                }
                (from, to)
            }
        }
        MotionKind::Right => {
            to.col = (from.col + 1).min(buf.line_len(from.row));
            (from, to)
        }
        MotionKind::Left => {
            motion::left(buf, &mut to);
            (to, from)
        }
        MotionKind::WordBackward { big } => {
            motion::word_backward(buf, &mut to, big);
            ordered(from, to)
        }
        MotionKind::LineStart => {
            motion::line_start(buf, &mut to);
            ordered(from, to)
        }
        MotionKind::FirstNonBlank => {
            motion::first_non_blank(buf, &mut to);
            ordered(from, to)
        }
        MotionKind::LineEnd => {
            motion::line_end(buf, &mut to);
            ordered(from, to)
        }
    };
    let (start, end) = chars;
    (start < end).then_some(Range::Chars { start, end })
}
