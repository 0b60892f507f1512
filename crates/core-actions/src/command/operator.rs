//! Delete / change / yank over a resolved range.
//!
//! Every target (motion, doubled operator, text object, visual selection)
//! first resolves to a [`Range`]; [`apply`] is the single place that edits
//! the buffer, writes the register and places the cursor.

use core_state::{EditorState, HighlightSpan, Mode, YankRegister, selection};
use core_text::{EditLog, Position};
use tracing::trace;

use super::motion::operator_range;
use super::{ExecStatus, OpTarget, Operator};

/// Region an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Range {
    /// Character-wise, `end` exclusive.
    Chars { start: Position, end: Position },
    /// Whole rows, inclusive.
    Lines { first: usize, last: usize },
}

pub(super) fn operate(
    op: Operator,
    target: OpTarget,
    st: &mut EditorState,
    log: &mut EditLog,
) -> ExecStatus {
    let range = match target {
        OpTarget::Motion(kind) => operator_range(kind, op, st),
        OpTarget::Line => {
            let row = st.cursor().row.min(st.buffer.last_row());
            Some(Range::Lines {
                first: row,
                last: row,
            })
        }
        OpTarget::Object { object, inner } => {
            match object.find_bounds(&st.buffer, st.cursor(), inner) {
                None => return ExecStatus::Skipped,
                Some(span) if span.is_empty() => {
                    // Nothing between the delimiters: only change has an effect.
                    if op != Operator::Change {
                        return ExecStatus::Skipped;
                    }
                    st.buffer.cursor = span.start;
                    None
                }
                Some(span) => Some(Range::Chars {
                    start: span.start,
                    end: st.buffer.next_position(span.end),
                }),
            }
        }
    };
    apply(op, range, st, log)
}

pub(super) fn visual_operate(op: Operator, st: &mut EditorState, log: &mut EditLog) -> ExecStatus {
    if !st.mode.is_visual() {
        return ExecStatus::Skipped;
    }
    let cursor = st.cursor();
    let anchor = st.visual_anchor.unwrap_or(cursor);
    let (start, end) = selection::bounds(anchor, cursor, st.mode, &st.buffer);
    let range = if st.mode == Mode::VisualLine {
        Range::Lines {
            first: start.row,
            last: end.row,
        }
    } else {
        Range::Chars {
            start,
            end: st.buffer.next_position(end),
        }
    };
    let status = apply(op, Some(range), st, log);
    if op != Operator::Change {
        st.set_mode(Mode::Normal);
    }
    status
}

/// Perform `op` over `range`. A `None` range only lets change enter Insert.
pub(crate) fn apply(
    op: Operator,
    range: Option<Range>,
    st: &mut EditorState,
    log: &mut EditLog,
) -> ExecStatus {
    let Some(range) = range else {
        if op == Operator::Change {
            st.set_mode(Mode::Insert);
            return ExecStatus::Executed;
        }
        return ExecStatus::Skipped;
    };
    trace!(target: "actions.dispatch", op = op.name(), ?range, "operator");
    match range {
        Range::Chars { start, end } => {
            if op == Operator::Yank {
                st.register = YankRegister {
                    text: st.buffer.text_in(start, end),
                    linewise: false,
                };
                st.request_highlight(HighlightSpan {
                    start,
                    end: st.buffer.prev_position(end),
                    linewise: false,
                });
            } else {
                let text = log.remove(&mut st.buffer, start, end);
                st.register = YankRegister {
                    text,
                    linewise: false,
                };
            }
            st.buffer.cursor = start;
        }
        Range::Lines { first, last } => {
            let text = st.buffer.lines()[first..=last].join("\n");
            match op {
                Operator::Yank => {
                    st.request_highlight(HighlightSpan {
                        start: Position::new(first, 0),
                        end: Position::new(last, st.buffer.line_len(last)),
                        linewise: true,
                    });
                    st.buffer.cursor.row = first;
                }
                Operator::Delete => {
                    log.delete_lines(&mut st.buffer, first, last - first + 1);
                    let row = first.min(st.buffer.last_row());
                    st.buffer.cursor = Position::new(row, st.buffer.first_non_blank(row));
                }
                Operator::Change => {
                    let end = Position::new(last, st.buffer.line_len(last));
                    log.remove(&mut st.buffer, Position::new(first, 0), end);
                    st.buffer.cursor = Position::new(first, 0);
                }
            }
            st.register = YankRegister {
                text,
                linewise: true,
            };
        }
    }
    if op == Operator::Change {
        st.set_mode(Mode::Insert);
    } else {
        st.clamp_cursor();
    }
    ExecStatus::Executed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MotionKind;
    use crate::text_object::TextObjectKind;
    use core_text::TextBuffer;
    use pretty_assertions::assert_eq;

    fn state(text: &str, row: usize, col: usize) -> EditorState {
        let mut st = EditorState::new(Mode::Normal, None);
        st.buffer = TextBuffer::from_text(text);
        st.buffer.cursor = Position::new(row, col);
        st
    }

    #[test]
    fn delete_line_moves_to_first_non_blank() {
        let mut st = state("a\n  b\nc", 0, 0);
        let mut log = EditLog::new();
        operate(Operator::Delete, OpTarget::Line, &mut st, &mut log);
        assert_eq!(st.buffer.text(), "  b\nc");
        assert_eq!(st.cursor(), Position::new(0, 2));
        assert_eq!(st.register, YankRegister { text: "a".into(), linewise: true });
    }

    #[test]
    fn delete_last_line_moves_up() {
        let mut st = state("a\nb", 1, 0);
        operate(Operator::Delete, OpTarget::Line, &mut st, &mut EditLog::new());
        assert_eq!(st.buffer.lines(), &["a".to_string()]);
        assert_eq!(st.cursor(), Position::origin());
    }

    #[test]
    fn change_line_keeps_an_empty_line() {
        let mut st = state("x\nold\ny", 1, 2);
        operate(Operator::Change, OpTarget::Line, &mut st, &mut EditLog::new());
        assert_eq!(st.buffer.text(), "x\n\ny");
        assert_eq!(st.mode, Mode::Insert);
        assert_eq!(st.cursor(), Position::new(1, 0));
    }

    #[test]
    fn yank_word_moves_to_start_and_requests_highlight() {
        let mut st = state("foo bar", 0, 5);
        let mut log = EditLog::new();
        let status = operate(
            Operator::Yank,
            OpTarget::Object { object: TextObjectKind::Word, inner: true },
            &mut st,
            &mut log,
        );
        assert_eq!(status, ExecStatus::Executed);
        assert!(log.is_empty());
        assert_eq!(st.register.text, "bar");
        assert_eq!(st.cursor(), Position::new(0, 4));
        let span = st.take_highlight_request().unwrap();
        assert_eq!((span.start, span.end), (Position::new(0, 4), Position::new(0, 6)));
    }

    #[test]
    fn change_inside_empty_quotes_enters_insert_between_them() {
        let mut st = state("a \"\" b", 0, 2);
        let mut log = EditLog::new();
        let target = OpTarget::Object { object: TextObjectKind::Quote('"'), inner: true };
        assert_eq!(operate(Operator::Change, target, &mut st, &mut log), ExecStatus::Executed);
        assert!(log.is_empty());
        assert_eq!(st.mode, Mode::Insert);
        assert_eq!(st.cursor(), Position::new(0, 3));
        let mut st = state("a \"\" b", 0, 2);
        assert_eq!(operate(Operator::Delete, target, &mut st, &mut log), ExecStatus::Skipped);
    }

    #[test]
    fn delete_to_line_end_clamps_cursor() {
        let mut st = state("hello world", 0, 5);
        operate(
            Operator::Delete,
            OpTarget::Motion(MotionKind::LineEnd),
            &mut st,
            &mut EditLog::new(),
        );
        assert_eq!(st.buffer.text(), "hello");
        assert_eq!(st.cursor(), Position::new(0, 4));
        assert_eq!(st.register.text, " world");
    }

    #[test]
    fn visual_delete_includes_cursor_grapheme() {
        let mut st = state("abcdef", 0, 1);
        st.set_mode(Mode::Visual);
        st.buffer.cursor = Position::new(0, 3);
        visual_operate(Operator::Delete, &mut st, &mut EditLog::new());
        assert_eq!(st.buffer.text(), "aef");
        assert_eq!(st.mode, Mode::Normal);
        assert_eq!(st.visual_anchor, None);
    }

    #[test]
    fn visual_line_yank_is_linewise() {
        let mut st = state("one\ntwo\nthree", 2, 1);
        st.set_mode(Mode::VisualLine);
        st.buffer.cursor = Position::new(1, 0);
        visual_operate(Operator::Yank, &mut st, &mut EditLog::new());
        assert_eq!(st.register, YankRegister { text: "two\nthree".into(), linewise: true });
        assert_eq!(st.cursor().row, 1);
        assert_eq!(st.mode, Mode::Normal);
    }
}
