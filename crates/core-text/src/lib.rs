//! Text primitives for the modal line editor: grapheme arithmetic, display
//! widths, the line buffer with its revertible edit log, and cursor motions.
//!
//! Every position above this crate is a (row, grapheme column) pair. Byte
//! offsets never leak out of `grapheme`.

pub mod buffer;
pub mod grapheme;
pub mod motion;
pub mod width;

pub use buffer::{Edit, EditError, EditLog, TextBuffer, normalize_line_endings};
pub use width::egc_width;

/// A cursor or span endpoint: row index plus grapheme column within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Inclusive span. `end < start` marks a located-but-empty range (for
/// example the inside of `()`), which operators treat as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}
