//! Line-oriented text buffer with grapheme-indexed editing primitives.
//!
//! The buffer is an ordered `Vec<String>` (never empty; an empty buffer is
//! `[""]`) plus a cursor. Every structural edit is expressed in grapheme
//! positions and funnels into two half-open primitives, [`TextBuffer::insert_text`]
//! and [`TextBuffer::remove`], which are exact inverses of each other. The
//! [`EditLog`] records those primitives as they are applied so an owning
//! command can revert them later (capture-before-mutate, reconstruct-by-replay).

use crate::{Position, grapheme};
use thiserror::Error;

/// Buffer-level invariant failures surfaced while reverting an edit log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("row {row} out of range (buffer has {rows} lines)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("column {col} out of range on row {row} (line has {len} graphemes)")]
    ColumnOutOfRange { row: usize, col: usize, len: usize },
    #[error("buffer text at {row}:{col} no longer matches the recorded edit")]
    TextMismatch { row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    pub cursor: Position,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::origin(),
        }
    }

    /// Build a buffer from LF-separated text. The cursor starts at the origin.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: Position::origin(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line content; out-of-range rows read as empty.
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(String::as_str).unwrap_or("")
    }

    /// Grapheme count of a line.
    pub fn line_len(&self, row: usize) -> usize {
        grapheme::count(self.line(row))
    }

    pub fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    /// Full content joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Grapheme clusters plus one per line separator (the unit of the char limit).
    pub fn grapheme_total(&self) -> usize {
        self.lines.iter().map(|l| grapheme::count(l)).sum::<usize>() + self.lines.len() - 1
    }

    /// Position one past the last grapheme of the buffer.
    pub fn end(&self) -> Position {
        let row = self.last_row();
        Position::new(row, self.line_len(row))
    }

    /// Clamp a position into the buffer. With `past_end` the column may sit
    /// one past the last grapheme (Insert/Replace); otherwise it rests on the
    /// last grapheme (Normal/Visual) or 0 on an empty line.
    pub fn clamp(&self, pos: Position, past_end: bool) -> Position {
        let row = pos.row.min(self.last_row());
        let len = self.line_len(row);
        let max = if past_end { len } else { len.saturating_sub(1) };
        Position::new(row, pos.col.min(max))
    }

    pub fn clamp_cursor(&mut self, past_end: bool) {
        self.cursor = self.clamp(self.cursor, past_end);
    }

    /// Replace all content; cursor resets to the origin.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// Break `row` in two at grapheme `col`.
    pub fn split_line(&mut self, row: usize, col: usize) {
        if row >= self.lines.len() {
            return;
        }
        let at = grapheme::to_byte_offset(&self.lines[row], col);
        let tail = self.lines[row].split_off(at);
        self.lines.insert(row + 1, tail);
    }

    /// Merge `row + 1` onto the end of `row`. Returns false when there is no next line.
    pub fn join_line(&mut self, row: usize) -> bool {
        if row + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(row + 1);
        self.lines[row].push_str(&next);
        true
    }

    /// Insert `text` at `at`, fanning multi-line text across new lines. The
    /// head of the original line stays on the first segment and its tail
    /// follows the last. Returns the position just past the inserted text.
    pub fn insert_text(&mut self, at: Position, text: &str) -> Position {
        let at = self.clamp(at, true);
        let Some((first, rest)) = text.split_once('\n') else {
            self.lines[at.row] = grapheme::insert_at(&self.lines[at.row], at.col, text);
            return Position::new(at.row, at.col + grapheme::count(text));
        };
        self.split_line(at.row, at.col);
        self.lines[at.row].push_str(first);
        let mut segments: Vec<&str> = rest.split('\n').collect();
        let last = segments.pop().unwrap_or_default();
        let mut row = at.row;
        for segment in segments {
            row += 1;
            self.lines.insert(row, segment.to_string());
        }
        row += 1;
        self.lines[row].insert_str(0, last);
        Position::new(row, grapheme::count(last))
    }

    /// Remove the half-open span `[start, end)`. A column at the line length
    /// addresses the separator after that line, so `(r, len)..(r + 1, 0)`
    /// removes exactly one line break. Returns the removed text.
    pub fn remove(&mut self, start: Position, end: Position) -> String {
        let start = self.clamp(start, true);
        let end = self.clamp(end, true);
        if end <= start {
            return String::new();
        }
        let removed = self.text_in(start, end);
        if start.row == end.row {
            self.lines[start.row] = grapheme::delete_range(&self.lines[start.row], start.col, end.col);
            return removed;
        }
        let head_byte = grapheme::to_byte_offset(&self.lines[start.row], start.col);
        self.lines[start.row].truncate(head_byte);
        self.lines[end.row] = grapheme::delete_range(&self.lines[end.row], 0, end.col);
        self.lines.drain(start.row + 1..end.row);
        self.join_line(start.row);
        removed
    }

    /// Text covered by the half-open span `[start, end)`, lines joined with `\n`.
    pub fn text_in(&self, start: Position, end: Position) -> String {
        let start = self.clamp(start, true);
        let end = self.clamp(end, true);
        if end <= start {
            return String::new();
        }
        if start.row == end.row {
            return grapheme::slice(self.line(start.row), start.col, end.col).to_string();
        }
        let first = self.line(start.row);
        let mut out = grapheme::slice(first, start.col, grapheme::count(first)).to_string();
        for row in start.row + 1..end.row {
            out.push('\n');
            out.push_str(self.line(row));
        }
        out.push('\n');
        out.push_str(grapheme::slice(self.line(end.row), 0, end.col));
        out
    }

    /// Position one grapheme after `pos`, stepping over the line separator.
    /// Saturates at the buffer end.
    pub fn next_position(&self, pos: Position) -> Position {
        let pos = self.clamp(pos, true);
        if pos.col < self.line_len(pos.row) {
            Position::new(pos.row, pos.col + 1)
        } else if pos.row < self.last_row() {
            Position::new(pos.row + 1, 0)
        } else {
            pos
        }
    }

    /// Position one grapheme before `pos`, stepping back over the line
    /// separator onto the previous line's end slot. Saturates at the origin.
    pub fn prev_position(&self, pos: Position) -> Position {
        let pos = self.clamp(pos, true);
        if pos.col > 0 {
            Position::new(pos.row, pos.col - 1)
        } else if pos.row > 0 {
            Position::new(pos.row - 1, self.line_len(pos.row - 1))
        } else {
            pos
        }
    }

    /// Character-wise delete with an inclusive `end` (vim semantics). An end
    /// column at or past the last grapheme also removes the separator when a
    /// following line exists.
    pub fn delete_range(&mut self, start: Position, end: Position) -> String {
        let exclusive = self.next_position(end);
        self.remove(start, exclusive)
    }

    /// Exclusive span removed by [`TextBuffer::delete_lines`]: the separator
    /// before the block is taken when the block reaches the last line.
    pub fn line_block_span(&self, start_row: usize, count: usize) -> Option<(Position, Position)> {
        if start_row >= self.lines.len() || count == 0 {
            return None;
        }
        let end_row = (start_row + count).min(self.lines.len());
        if end_row < self.lines.len() {
            Some((Position::new(start_row, 0), Position::new(end_row, 0)))
        } else if start_row > 0 {
            let prev = start_row - 1;
            Some((Position::new(prev, self.line_len(prev)), self.end()))
        } else {
            Some((Position::origin(), self.end()))
        }
    }

    /// Line-wise delete of `count` rows from `start_row`. Deleting every line
    /// leaves a single empty line. Returns the removed lines.
    pub fn delete_lines(&mut self, start_row: usize, count: usize) -> Vec<String> {
        if start_row >= self.lines.len() || count == 0 {
            return Vec::new();
        }
        let end_row = (start_row + count).min(self.lines.len());
        let removed: Vec<String> = self.lines.drain(start_row..end_row).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        removed
    }

    /// Column of the first non-blank grapheme of `row` (0 when blank).
    pub fn first_non_blank(&self, row: usize) -> usize {
        grapheme::iter_forward(self.line(row), 0)
            .find(|c| !c.text.chars().all(char::is_whitespace))
            .map(|c| c.index)
            .unwrap_or(0)
    }

    /// Position reached after inserting `text` at `at`, without mutating.
    pub fn end_of_insert(at: Position, text: &str) -> Position {
        match text.rsplit_once('\n') {
            None => Position::new(at.row, at.col + grapheme::count(text)),
            Some((head, last)) => Position::new(
                at.row + head.matches('\n').count() + 1,
                grapheme::count(last),
            ),
        }
    }

    fn check(&self, pos: Position) -> Result<(), EditError> {
        if pos.row >= self.lines.len() {
            return Err(EditError::RowOutOfRange {
                row: pos.row,
                rows: self.lines.len(),
            });
        }
        let len = self.line_len(pos.row);
        if pos.col > len {
            return Err(EditError::ColumnOutOfRange {
                row: pos.row,
                col: pos.col,
                len,
            });
        }
        Ok(())
    }
}

/// One applied buffer primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Inserted { at: Position, text: String },
    Removed { at: Position, text: String },
}

/// Ordered record of the primitives a command applied, revertible as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLog {
    edits: Vec<Edit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    /// Insert through the buffer and record it. Empty text records nothing.
    pub fn insert(&mut self, buf: &mut TextBuffer, at: Position, text: &str) -> Position {
        let at = buf.clamp(at, true);
        if text.is_empty() {
            return at;
        }
        let end = buf.insert_text(at, text);
        self.edits.push(Edit::Inserted {
            at,
            text: text.to_string(),
        });
        end
    }

    /// Remove `[start, end)` through the buffer and record it.
    pub fn remove(&mut self, buf: &mut TextBuffer, start: Position, end: Position) -> String {
        let start = buf.clamp(start, true);
        let removed = buf.remove(start, end);
        if !removed.is_empty() {
            self.edits.push(Edit::Removed {
                at: start,
                text: removed.clone(),
            });
        }
        removed
    }

    /// Inclusive character-wise delete, recorded.
    pub fn delete_range(&mut self, buf: &mut TextBuffer, start: Position, end: Position) -> String {
        let exclusive = buf.next_position(end);
        self.remove(buf, start, exclusive)
    }

    /// Line-wise delete, recorded. Deleting every line leaves `[""]`.
    pub fn delete_lines(&mut self, buf: &mut TextBuffer, start_row: usize, count: usize) -> Vec<String> {
        let Some((start, end)) = buf.line_block_span(start_row, count) else {
            return Vec::new();
        };
        let text = buf.text_in(start, end);
        let removed = buf.delete_lines(start_row, count);
        if !text.is_empty() {
            self.edits.push(Edit::Removed { at: start, text });
        }
        removed
    }

    /// Undo every recorded edit, newest first. Works on a scratch copy so a
    /// failure leaves `buf` untouched.
    pub fn revert(&self, buf: &mut TextBuffer) -> Result<(), EditError> {
        let mut scratch = buf.clone();
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Inserted { at, text } => {
                    scratch.check(*at)?;
                    let end = TextBuffer::end_of_insert(*at, text);
                    scratch.check(end)?;
                    if scratch.text_in(*at, end) != *text {
                        return Err(EditError::TextMismatch {
                            row: at.row,
                            col: at.col,
                        });
                    }
                    scratch.remove(*at, end);
                }
                Edit::Removed { at, text } => {
                    scratch.check(*at)?;
                    scratch.insert_text(*at, text);
                }
            }
        }
        buf.lines = scratch.lines;
        Ok(())
    }

    /// Re-apply every recorded edit, oldest first, on a scratch copy.
    pub fn replay(&self, buf: &mut TextBuffer) -> Result<(), EditError> {
        let mut scratch = buf.clone();
        for edit in &self.edits {
            match edit {
                Edit::Inserted { at, text } => {
                    scratch.check(*at)?;
                    scratch.insert_text(*at, text);
                }
                Edit::Removed { at, text } => {
                    scratch.check(*at)?;
                    let end = TextBuffer::end_of_insert(*at, text);
                    scratch.check(end)?;
                    if scratch.text_in(*at, end) != *text {
                        return Err(EditError::TextMismatch {
                            row: at.row,
                            col: at.col,
                        });
                    }
                    scratch.remove(*at, end);
                }
            }
        }
        buf.lines = scratch.lines;
        Ok(())
    }
}

/// Normalize CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(input: &str) -> String {
    if !input.contains('\r') {
        return input.to_string();
    }
    input.replace("\r\n", "\n").replace('\r', "\n")
}
