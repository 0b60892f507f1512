//! Editor commands.
//!
//! A [`Command`] is a value: the registry hands out clones and each clone is
//! executed against an [`EditorState`]. Content-changing commands record
//! their edits in an [`EditLog`] while executing, together with the cursor,
//! mode, visual anchor and register they started from. Undo reverts the log;
//! redo restores the starting point and executes the same instance again.
//!
//! Sub-modules split execution by concern:
//! * `motion`: cursor movement and operator ranges for motions.
//! * `edit`: Insert/Replace typing, paste, join and single-grapheme edits.
//! * `operator`: delete/change/yank over motions, lines, objects and
//!   selections.
//! * `mode`: mode entry and exit, `o`/`O`, selection tweaks.
//!
//! Metadata (`undoable`, `changes_content`, `mode_change`) is a pure
//! function of the variant so the dispatcher can decide what to publish
//! without running anything.

mod edit;
mod mode;
mod motion;
mod operator;

use core_state::{EditorState, HistoryEntry, Mode, UndoError, YankRegister};
use core_text::{EditLog, Position};
use tracing::trace;

use crate::text_object::TextObjectKind;

/// Outcome of executing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// Precondition not met; the key was consumed with no effect.
    Skipped,
    /// Not handled here; the embedding widget should see the key.
    PassThrough,
    Executed,
}

/// Static description of what a command may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub undoable: bool,
    pub changes_content: bool,
    pub mode_change: bool,
}

impl Meta {
    const fn new(undoable: bool, changes_content: bool, mode_change: bool) -> Self {
        Self {
            undoable,
            changes_content,
            mode_change,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordForward { big: bool },
    WordBackward { big: bool },
    WordEnd { big: bool },
    LineStart,
    FirstNonBlank,
    LineEnd,
    BufferStart,
    BufferEnd,
}

impl MotionKind {
    pub fn is_vertical(self) -> bool {
        matches!(self, MotionKind::Up | MotionKind::Down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Delete => "delete",
            Operator::Change => "change",
            Operator::Yank => "yank",
        }
    }
}

/// What an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpTarget {
    Motion(MotionKind),
    /// The cursor line (`dd`, `cc`, `yy`).
    Line,
    Object { object: TextObjectKind, inner: bool },
}

/// Where `i`, `a`, `I` and `A` put the cursor before entering Insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertEntry {
    Before,
    After,
    LineStart,
    LineEnd,
}

/// Commands the dispatcher runs itself instead of executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Undo,
    Redo,
    /// Start a multi-key sequence after the given key.
    BeginPending(char),
    /// Ask the host to submit the current value.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move(MotionKind),
    EnterInsert(InsertEntry),
    EnterReplace,
    /// Enter the given visual mode, or leave to Normal when already in it.
    ToggleVisual(Mode),
    ExitToNormal,
    OpenLine { above: bool },
    InsertText(String),
    OverwriteText(String),
    InsertNewline,
    InsertTab,
    Backspace,
    DeleteForward,
    DeleteWordBefore,
    DeleteToLineStart,
    ReplaceUnder(String),
    JoinLines,
    Paste { before: bool },
    Operate { op: Operator, target: OpTarget },
    VisualOperate(Operator),
    VisualSwap,
    SelectObject { object: TextObjectKind, inner: bool },
    PassThrough,
    Control(Control),
}

impl CommandKind {
    pub fn meta(&self) -> Meta {
        use CommandKind::*;
        match self {
            Move(_) | VisualSwap | PassThrough => Meta::new(false, false, false),
            EnterInsert(_) | EnterReplace | ToggleVisual(_) | ExitToNormal => {
                Meta::new(false, false, true)
            }
            SelectObject { .. } => Meta::new(false, false, true),
            OpenLine { .. } => Meta::new(true, true, true),
            InsertText(_) | OverwriteText(_) | InsertNewline | InsertTab | Backspace
            | DeleteForward | DeleteWordBefore | DeleteToLineStart | ReplaceUnder(_)
            | JoinLines | Paste { .. } => Meta::new(true, true, false),
            Operate { op, .. } => match op {
                Operator::Delete => Meta::new(true, true, false),
                Operator::Change => Meta::new(true, true, true),
                Operator::Yank => Meta::new(false, false, false),
            },
            VisualOperate(op) => match op {
                Operator::Yank => Meta::new(false, false, true),
                Operator::Delete | Operator::Change => Meta::new(true, true, true),
            },
            Control(self::Control::Undo) => Meta::new(false, true, false),
            Control(self::Control::Redo) => Meta::new(false, true, true),
            Control(_) => Meta::new(false, false, false),
        }
    }

    /// Delete, change and yank overwrite the register.
    fn writes_register(&self) -> bool {
        matches!(self, CommandKind::Operate { .. } | CommandKind::VisualOperate(_))
    }

    fn name(&self) -> &'static str {
        use CommandKind::*;
        match self {
            Move(_) => "move",
            EnterInsert(_) => "enter_insert",
            EnterReplace => "enter_replace",
            ToggleVisual(_) => "toggle_visual",
            ExitToNormal => "exit_to_normal",
            OpenLine { .. } => "open_line",
            InsertText(_) => "insert_text",
            OverwriteText(_) => "overwrite_text",
            InsertNewline => "insert_newline",
            InsertTab => "insert_tab",
            Backspace => "backspace",
            DeleteForward => "delete_forward",
            DeleteWordBefore => "delete_word_before",
            DeleteToLineStart => "delete_to_line_start",
            ReplaceUnder(_) => "replace_under",
            JoinLines => "join_lines",
            Paste { .. } => "paste",
            Operate { .. } => "operate",
            VisualOperate(_) => "visual_operate",
            VisualSwap => "visual_swap",
            SelectObject { .. } => "select_object",
            PassThrough => "pass_through",
            Control(_) => "control",
        }
    }
}

/// Starting point and edits of the last execution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Captured {
    cursor_before: Position,
    mode_before: Mode,
    anchor_before: Option<Position>,
    register_before: YankRegister,
    log: EditLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    captured: Option<Captured>,
}

impl From<CommandKind> for Command {
    fn from(kind: CommandKind) -> Self {
        Command::new(kind)
    }
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            captured: None,
        }
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn meta(&self) -> Meta {
        self.kind.meta()
    }

    /// True once an execution recorded at least one buffer edit.
    pub fn has_edits(&self) -> bool {
        self.captured.as_ref().is_some_and(|c| !c.log.is_empty())
    }

    /// Run the command against `st`. Control commands are the dispatcher's
    /// business and report `Skipped` here.
    pub fn execute(&mut self, st: &mut EditorState) -> ExecStatus {
        let cursor_before = st.cursor();
        let mode_before = st.mode;
        let anchor_before = st.visual_anchor;
        let register_before = st.register.clone();
        let mut log = EditLog::new();
        let status = match &self.kind {
            CommandKind::Move(kind) => motion::apply(*kind, st),
            CommandKind::EnterInsert(entry) => mode::enter_insert(*entry, st),
            CommandKind::EnterReplace => mode::enter(Mode::Replace, st),
            CommandKind::ToggleVisual(target) => mode::toggle_visual(*target, st),
            CommandKind::ExitToNormal => mode::exit_to_normal(st),
            CommandKind::OpenLine { above } => mode::open_line(*above, st, &mut log),
            CommandKind::InsertText(text) => edit::insert_text(text, st, &mut log),
            CommandKind::OverwriteText(text) => edit::overwrite_text(text, st, &mut log),
            CommandKind::InsertNewline => edit::insert_text("\n", st, &mut log),
            CommandKind::InsertTab => edit::insert_text("\t", st, &mut log),
            CommandKind::Backspace => edit::backspace(st, &mut log),
            CommandKind::DeleteForward => edit::delete_forward(st, &mut log),
            CommandKind::DeleteWordBefore => edit::delete_word_before(st, &mut log),
            CommandKind::DeleteToLineStart => edit::delete_to_line_start(st, &mut log),
            CommandKind::ReplaceUnder(with) => edit::replace_under(with, st, &mut log),
            CommandKind::JoinLines => edit::join_lines(st, &mut log),
            CommandKind::Paste { before } => edit::paste(*before, st, &mut log),
            CommandKind::Operate { op, target } => operator::operate(*op, *target, st, &mut log),
            CommandKind::VisualOperate(op) => operator::visual_operate(*op, st, &mut log),
            CommandKind::VisualSwap => mode::visual_swap(st),
            CommandKind::SelectObject { object, inner } => {
                mode::select_object(*object, *inner, st)
            }
            CommandKind::PassThrough => ExecStatus::PassThrough,
            CommandKind::Control(_) => ExecStatus::Skipped,
        };
        if !matches!(self.kind, CommandKind::Move(m) if m.is_vertical()) {
            st.sticky_col = None;
        }
        trace!(target: "actions.dispatch", op = self.kind.name(), ?status, edits = log.edits().len(), row = st.cursor().row, col = st.cursor().col, "execute");
        if status == ExecStatus::Executed && !log.is_empty() {
            self.captured = Some(Captured {
                cursor_before,
                mode_before,
                anchor_before,
                register_before,
                log,
            });
        }
        status
    }
}

impl HistoryEntry<EditorState> for Command {
    fn undo(&mut self, st: &mut EditorState) -> Result<(), UndoError> {
        let captured = self.captured.as_ref().ok_or(UndoError::NotExecuted)?;
        captured.log.revert(&mut st.buffer)?;
        st.buffer.cursor = captured.cursor_before;
        st.clamp_cursor();
        Ok(())
    }

    /// Execute again from the captured starting point. A paste reads the
    /// register it originally read; afterwards the register only changes if
    /// the command itself writes it.
    fn redo(&mut self, st: &mut EditorState) -> Result<(), UndoError> {
        let captured = self.captured.take().ok_or(UndoError::NotExecuted)?;
        let saved = st.clone();
        st.buffer.cursor = captured.cursor_before;
        st.mode = captured.mode_before;
        st.visual_anchor = captured.anchor_before;
        st.register = captured.register_before.clone();
        let status = self.execute(st);
        if status != ExecStatus::Executed || !self.has_edits() {
            *st = saved;
            self.captured = Some(captured);
            return Err(UndoError::NoEffect);
        }
        if !self.kind.writes_register() {
            st.register = saved.register;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::TextBuffer;
    use pretty_assertions::assert_eq;

    fn state(text: &str, mode: Mode, row: usize, col: usize) -> EditorState {
        let mut st = EditorState::new(mode, None);
        st.buffer = TextBuffer::from_text(text);
        st.buffer.cursor = Position::new(row, col);
        st
    }

    #[test]
    fn yank_is_not_undoable_but_delete_is() {
        let yank = CommandKind::Operate {
            op: Operator::Yank,
            target: OpTarget::Line,
        };
        let delete = CommandKind::Operate {
            op: Operator::Delete,
            target: OpTarget::Line,
        };
        assert!(!yank.meta().undoable);
        assert!(delete.meta().undoable && delete.meta().changes_content);
        assert!(CommandKind::ExitToNormal.meta().mode_change);
    }

    #[test]
    fn undo_then_redo_restores_content_and_cursor() {
        let mut st = state("one two", Mode::Normal, 0, 0);
        let mut cmd = Command::new(CommandKind::Operate {
            op: Operator::Delete,
            target: OpTarget::Motion(MotionKind::WordForward { big: false }),
        });
        assert_eq!(cmd.execute(&mut st), ExecStatus::Executed);
        assert_eq!(st.buffer.text(), "two");
        cmd.undo(&mut st).unwrap();
        assert_eq!(st.buffer.text(), "one two");
        assert_eq!(st.cursor(), Position::origin());
        cmd.redo(&mut st).unwrap();
        assert_eq!(st.buffer.text(), "two");
    }

    #[test]
    fn redo_runs_the_command_again() {
        let mut st = state("one two", Mode::Normal, 0, 4);
        let mut cmd = Command::new(CommandKind::Operate {
            op: Operator::Change,
            target: OpTarget::Motion(MotionKind::WordForward { big: false }),
        });
        cmd.execute(&mut st);
        assert_eq!((st.buffer.text().as_str(), st.mode), ("one ", Mode::Insert));
        st.set_mode(Mode::Normal);
        cmd.undo(&mut st).unwrap();
        st.register = YankRegister { text: "other".into(), linewise: false };
        cmd.redo(&mut st).unwrap();
        assert_eq!(st.buffer.text(), "one ");
        assert_eq!(st.mode, Mode::Insert);
        assert_eq!(st.cursor(), Position::new(0, 4));
        assert_eq!(st.register.text, "two");
    }

    #[test]
    fn redo_that_no_longer_applies_leaves_state() {
        let mut st = state("ab\ncd", Mode::Normal, 0, 0);
        let mut cmd = Command::new(CommandKind::JoinLines);
        cmd.execute(&mut st);
        cmd.undo(&mut st).unwrap();
        st.buffer.set_text("single");
        assert_eq!(cmd.redo(&mut st), Err(UndoError::NoEffect));
        assert_eq!(st.buffer.text(), "single");
        assert!(cmd.has_edits());
    }

    #[test]
    fn unexecuted_command_cannot_undo() {
        let mut st = state("abc", Mode::Normal, 0, 0);
        let mut cmd = Command::new(CommandKind::JoinLines);
        assert_eq!(cmd.undo(&mut st), Err(UndoError::NotExecuted));
        // Skipped execution captures nothing either.
        assert_eq!(cmd.execute(&mut st), ExecStatus::Skipped);
        assert!(!cmd.has_edits());
    }

    #[test]
    fn vertical_moves_keep_sticky_column() {
        let mut st = state("abcdef\nx\nabcdef", Mode::Normal, 0, 4);
        Command::new(CommandKind::Move(MotionKind::Down)).execute(&mut st);
        assert_eq!(st.cursor(), Position::new(1, 0));
        Command::new(CommandKind::Move(MotionKind::Down)).execute(&mut st);
        assert_eq!(st.cursor(), Position::new(2, 4));
        Command::new(CommandKind::Move(MotionKind::Left)).execute(&mut st);
        assert_eq!(st.sticky_col, None);
    }
}
