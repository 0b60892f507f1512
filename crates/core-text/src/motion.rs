//! Cursor motion helpers.
//!
//! These operate purely on a `TextBuffer` + `Position` pair and are free of
//! mode or register state. Callers clamp the result for the active mode;
//! motions themselves may leave the column one past the last grapheme.
//!
//! Word motions walk the buffer one grapheme at a time, where column
//! `line_len(row)` stands for the line break after that row.

use crate::{Position, TextBuffer, grapheme};
use grapheme::CharClass;

fn class_at(buf: &TextBuffer, pos: Position, big: bool) -> Option<CharClass> {
    grapheme::at(buf.line(pos.row), pos.col).map(|g| grapheme::classify(g, big))
}

fn step_forward(buf: &TextBuffer, pos: Position) -> Option<Position> {
    if pos.col < buf.line_len(pos.row) {
        Some(Position::new(pos.row, pos.col + 1))
    } else if pos.row < buf.last_row() {
        Some(Position::new(pos.row + 1, 0))
    } else {
        None
    }
}

fn step_backward(buf: &TextBuffer, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        Some(Position::new(pos.row, pos.col - 1))
    } else if pos.row > 0 {
        Some(Position::new(pos.row - 1, buf.line_len(pos.row - 1)))
    } else {
        None
    }
}

/// Move left one grapheme; stops at column 0.
pub fn left(_buf: &TextBuffer, pos: &mut Position) {
    pos.col = pos.col.saturating_sub(1);
}

/// Move right one grapheme. `past_end` allows resting after the last
/// grapheme (Insert/Replace).
pub fn right(buf: &TextBuffer, pos: &mut Position, past_end: bool) {
    let len = buf.line_len(pos.row);
    let max = if past_end { len } else { len.saturating_sub(1) };
    if pos.col < max {
        pos.col += 1;
    }
}

pub fn line_start(_buf: &TextBuffer, pos: &mut Position) {
    pos.col = 0;
}

pub fn first_non_blank(buf: &TextBuffer, pos: &mut Position) {
    pos.col = buf.first_non_blank(pos.row);
}

/// Move to one past the last grapheme of the line.
pub fn line_end(buf: &TextBuffer, pos: &mut Position) {
    pos.col = buf.line_len(pos.row);
}

/// First non-blank of the first line.
pub fn buffer_start(buf: &TextBuffer, pos: &mut Position) {
    pos.row = 0;
    first_non_blank(buf, pos);
}

/// First non-blank of the last line.
pub fn buffer_end(buf: &TextBuffer, pos: &mut Position) {
    pos.row = buf.last_row();
    first_non_blank(buf, pos);
}

/// Move up one line preserving a target display column (sticky). Returns the
/// sticky column to carry into the next vertical motion; `None` computes it
/// from the current position.
pub fn up(buf: &TextBuffer, pos: &mut Position, sticky_col: Option<usize>) -> Option<usize> {
    if pos.row == 0 {
        return sticky_col;
    }
    vertical(buf, pos, pos.row - 1, sticky_col)
}

/// Move down one line preserving the sticky display column.
pub fn down(buf: &TextBuffer, pos: &mut Position, sticky_col: Option<usize>) -> Option<usize> {
    if pos.row >= buf.last_row() {
        return sticky_col;
    }
    vertical(buf, pos, pos.row + 1, sticky_col)
}

fn vertical(
    buf: &TextBuffer,
    pos: &mut Position,
    target_row: usize,
    sticky_col: Option<usize>,
) -> Option<usize> {
    let want = sticky_col.unwrap_or_else(|| grapheme::display_col(buf.line(pos.row), pos.col));
    pos.row = target_row;
    pos.col = grapheme::index_at_display_col(buf.line(target_row), want);
    Some(want)
}

/// `w` / `W`: start of the next word. Skips the rest of the current class
/// run, then blanks and line breaks; an empty line counts as a word. With
/// no further word the position lands one past the end of the buffer.
pub fn word_forward(buf: &TextBuffer, pos: &mut Position, big: bool) {
    let mut p = buf.clamp(*pos, true);
    if let Some(class) = class_at(buf, p, big)
        && class != CharClass::Blank
    {
        while class_at(buf, p, big) == Some(class) {
            p.col += 1;
        }
    }
    loop {
        match class_at(buf, p, big) {
            Some(CharClass::Blank) => p.col += 1,
            Some(_) => break,
            None => {
                if p.row >= buf.last_row() {
                    break;
                }
                p = Position::new(p.row + 1, 0);
                if buf.line_len(p.row) == 0 {
                    break;
                }
            }
        }
    }
    *pos = p;
}

/// `e` / `E`: last grapheme of the current or next word. Always advances at
/// least one grapheme; with no further word it stops on the last grapheme
/// of the buffer.
pub fn word_end(buf: &TextBuffer, pos: &mut Position, big: bool) {
    let start = buf.clamp(*pos, true);
    let Some(mut p) = step_forward(buf, start) else {
        return;
    };
    loop {
        match class_at(buf, p, big) {
            Some(CharClass::Blank) | None => match step_forward(buf, p) {
                Some(next) => p = next,
                None => {
                    *pos = buf.clamp(p, false);
                    return;
                }
            },
            Some(class) => {
                while class_at(buf, Position::new(p.row, p.col + 1), big) == Some(class) {
                    p.col += 1;
                }
                *pos = p;
                return;
            }
        }
    }
}

/// `b` / `B`: start of the current or previous word. Stops on an empty line
/// and at the buffer origin.
pub fn word_backward(buf: &TextBuffer, pos: &mut Position, big: bool) {
    let start = buf.clamp(*pos, true);
    let Some(mut p) = step_backward(buf, start) else {
        return;
    };
    loop {
        match class_at(buf, p, big) {
            Some(CharClass::Blank) | None => {
                if p.row != start.row && buf.line_len(p.row) == 0 {
                    break;
                }
                match step_backward(buf, p) {
                    Some(prev) => p = prev,
                    None => break,
                }
            }
            Some(class) => {
                while p.col > 0 && class_at(buf, Position::new(p.row, p.col - 1), big) == Some(class) {
                    p.col -= 1;
                }
                break;
            }
        }
    }
    *pos = p;
}
