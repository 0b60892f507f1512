//! Editor state: buffer, mode, yank register, visual anchor and the
//! transient post-yank highlight.
//!
//! Commands in `core-actions` mutate an [`EditorState`] directly; history of
//! those commands lives in [`undo::CommandHistory`], generic over the entry
//! type so this crate stays ignorant of the command set.
//!
//! Cursor invariant: `buffer.cursor.col` may rest one past the last grapheme
//! only in Insert and Replace mode. [`EditorState::clamp_cursor`] restores the
//! invariant after any mode switch or content change.

use std::fmt;
use std::time::{Duration, Instant};

use core_text::{Position, TextBuffer};

pub mod selection;
pub mod undo;

pub use undo::{CommandHistory, HistoryEntry, UNDO_HISTORY_MAX, UndoError};

/// High-level editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Command/navigation mode.
    #[default]
    Normal,
    /// Text entry; printable input is spliced at the cursor.
    Insert,
    /// Character-wise selection.
    Visual,
    /// Line-wise selection.
    VisualLine,
    /// Printable input overwrites the grapheme under the cursor (or appends at line end).
    Replace,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::VisualLine => "visual-line",
            Mode::Replace => "replace",
        }
    }

    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }

    /// Whether the cursor may sit one past the last grapheme of a line.
    pub fn allows_past_end(self) -> bool {
        matches!(self, Mode::Insert | Mode::Replace)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-slot register written by yank, delete and change; read by paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YankRegister {
    pub text: String,
    pub linewise: bool,
}

/// Region flashed after a yank. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: Position,
    pub end: Position,
    pub linewise: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub span: HighlightSpan,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub buffer: TextBuffer,
    pub mode: Mode,
    pub register: YankRegister,
    /// Set on Visual/VisualLine entry, cleared on exit.
    pub visual_anchor: Option<Position>,
    /// Display column carried across consecutive vertical motions.
    pub sticky_col: Option<usize>,
    /// Maximum grapheme total (clusters plus one per separator); `None` is unlimited.
    pub char_limit: Option<usize>,
    highlight: Option<Highlight>,
    highlight_request: Option<HighlightSpan>,
}

impl EditorState {
    pub fn new(mode: Mode, char_limit: Option<usize>) -> Self {
        Self {
            buffer: TextBuffer::new(),
            mode,
            register: YankRegister::default(),
            visual_anchor: None,
            sticky_col: None,
            char_limit,
            highlight: None,
            highlight_request: None,
        }
    }

    pub fn cursor(&self) -> Position {
        self.buffer.cursor
    }

    /// Graphemes that may still be added before hitting the char limit.
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.char_limit
            .map(|limit| limit.saturating_sub(self.buffer.grapheme_total()))
    }

    /// True when `extra` more graphemes fit under the char limit.
    pub fn has_room_for(&self, extra: usize) -> bool {
        self.remaining_capacity().is_none_or(|room| extra <= room)
    }

    pub fn clamp_cursor(&mut self) {
        self.buffer.clamp_cursor(self.mode.allows_past_end());
    }

    /// Switch mode, maintaining the visual anchor and cursor invariants.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode.is_visual() {
            if !self.mode.is_visual() || self.visual_anchor.is_none() {
                self.visual_anchor = Some(self.buffer.cursor);
            }
        } else {
            self.visual_anchor = None;
        }
        self.mode = mode;
        self.clamp_cursor();
    }

    /// Queue a highlight for the orchestrator to timestamp after the command runs.
    pub fn request_highlight(&mut self, span: HighlightSpan) {
        self.highlight_request = Some(span);
    }

    pub fn take_highlight_request(&mut self) -> Option<HighlightSpan> {
        self.highlight_request.take()
    }

    pub fn set_highlight(&mut self, span: HighlightSpan, now: Instant, duration: Duration) {
        self.highlight = Some(Highlight {
            span,
            expires_at: now + duration,
        });
    }

    /// Current highlight if it has not yet expired at `now`.
    pub fn highlight_at(&self, now: Instant) -> Option<HighlightSpan> {
        self.highlight
            .filter(|h| now < h.expires_at)
            .map(|h| h.span)
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
        self.highlight_request = None;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Mode::Normal, None)
    }
}
