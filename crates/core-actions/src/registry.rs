//! Per-mode command tables.
//!
//! Tables are keyed by canonical key-token strings and built once into a
//! process-wide read-only registry. Lookup returns a template; the
//! dispatcher clones it before executing so history entries never share
//! captured state. Visual and VisualLine share one table.

use std::collections::HashMap;
use std::sync::LazyLock;

use core_state::Mode;

use crate::command::{
    Command, CommandKind, Control, InsertEntry, MotionKind, OpTarget, Operator,
};

type Table = HashMap<String, Command>;

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    normal: Table,
    insert: Table,
    visual: Table,
    replace: Table,
}

static REGISTRY: LazyLock<CommandRegistry> = LazyLock::new(CommandRegistry::build);

fn table(entries: Vec<(&str, CommandKind)>) -> Table {
    entries
        .into_iter()
        .map(|(key, kind)| (key.to_string(), Command::new(kind)))
        .collect()
}

fn mv(kind: MotionKind) -> CommandKind {
    CommandKind::Move(kind)
}

/// Motions shared by Normal and the visual modes.
fn motion_keys() -> Vec<(&'static str, CommandKind)> {
    vec![
        ("h", mv(MotionKind::Left)),
        ("l", mv(MotionKind::Right)),
        ("j", mv(MotionKind::Down)),
        ("k", mv(MotionKind::Up)),
        ("<left>", mv(MotionKind::Left)),
        ("<right>", mv(MotionKind::Right)),
        ("<down>", mv(MotionKind::Down)),
        ("<up>", mv(MotionKind::Up)),
        ("<backspace>", mv(MotionKind::Left)),
        ("<space>", mv(MotionKind::Right)),
        ("w", mv(MotionKind::WordForward { big: false })),
        ("W", mv(MotionKind::WordForward { big: true })),
        ("b", mv(MotionKind::WordBackward { big: false })),
        ("B", mv(MotionKind::WordBackward { big: true })),
        ("e", mv(MotionKind::WordEnd { big: false })),
        ("E", mv(MotionKind::WordEnd { big: true })),
        ("0", mv(MotionKind::LineStart)),
        ("<home>", mv(MotionKind::LineStart)),
        ("^", mv(MotionKind::FirstNonBlank)),
        ("$", mv(MotionKind::LineEnd)),
        ("<end>", mv(MotionKind::LineEnd)),
        ("G", mv(MotionKind::BufferEnd)),
        ("g", CommandKind::Control(Control::BeginPending('g'))),
    ]
}

fn operate(op: Operator, motion: MotionKind) -> CommandKind {
    CommandKind::Operate {
        op,
        target: OpTarget::Motion(motion),
    }
}

impl CommandRegistry {
    /// Shared default registry.
    pub fn global() -> &'static CommandRegistry {
        &REGISTRY
    }

    pub fn get(&self, mode: Mode, token: &str) -> Option<&Command> {
        let table = match mode {
            Mode::Normal => &self.normal,
            Mode::Insert => &self.insert,
            Mode::Visual | Mode::VisualLine => &self.visual,
            Mode::Replace => &self.replace,
        };
        table.get(token)
    }

    fn build() -> Self {
        let mut normal = motion_keys();
        normal.extend([
            ("i", CommandKind::EnterInsert(InsertEntry::Before)),
            ("a", CommandKind::EnterInsert(InsertEntry::After)),
            ("I", CommandKind::EnterInsert(InsertEntry::LineStart)),
            ("A", CommandKind::EnterInsert(InsertEntry::LineEnd)),
            ("<insert>", CommandKind::EnterInsert(InsertEntry::Before)),
            ("o", CommandKind::OpenLine { above: false }),
            ("O", CommandKind::OpenLine { above: true }),
            ("R", CommandKind::EnterReplace),
            ("v", CommandKind::Control(Control::BeginPending('v'))),
            ("V", CommandKind::ToggleVisual(Mode::VisualLine)),
            ("x", operate(Operator::Delete, MotionKind::Right)),
            ("<delete>", operate(Operator::Delete, MotionKind::Right)),
            ("X", operate(Operator::Delete, MotionKind::Left)),
            ("D", operate(Operator::Delete, MotionKind::LineEnd)),
            ("C", operate(Operator::Change, MotionKind::LineEnd)),
            ("s", operate(Operator::Change, MotionKind::Right)),
            (
                "S",
                CommandKind::Operate {
                    op: Operator::Change,
                    target: OpTarget::Line,
                },
            ),
            (
                "Y",
                CommandKind::Operate {
                    op: Operator::Yank,
                    target: OpTarget::Line,
                },
            ),
            ("J", CommandKind::JoinLines),
            ("p", CommandKind::Paste { before: false }),
            ("P", CommandKind::Paste { before: true }),
            ("u", CommandKind::Control(Control::Undo)),
            ("<ctrl+r>", CommandKind::Control(Control::Redo)),
            ("d", CommandKind::Control(Control::BeginPending('d'))),
            ("c", CommandKind::Control(Control::BeginPending('c'))),
            ("y", CommandKind::Control(Control::BeginPending('y'))),
            ("r", CommandKind::Control(Control::BeginPending('r'))),
            ("<enter>", CommandKind::Control(Control::Submit)),
            ("<escape>", CommandKind::PassThrough),
        ]);

        let insert = vec![
            ("<escape>", CommandKind::ExitToNormal),
            ("<ctrl+c>", CommandKind::ExitToNormal),
            ("<enter>", CommandKind::Control(Control::Submit)),
            ("<shift+enter>", CommandKind::InsertNewline),
            ("<alt+enter>", CommandKind::InsertNewline),
            ("<ctrl+j>", CommandKind::InsertNewline),
            ("<tab>", CommandKind::InsertTab),
            ("<backspace>", CommandKind::Backspace),
            ("<ctrl+h>", CommandKind::Backspace),
            ("<delete>", CommandKind::DeleteForward),
            ("<ctrl+w>", CommandKind::DeleteWordBefore),
            ("<ctrl+u>", CommandKind::DeleteToLineStart),
            ("<left>", mv(MotionKind::Left)),
            ("<right>", mv(MotionKind::Right)),
            ("<up>", mv(MotionKind::Up)),
            ("<down>", mv(MotionKind::Down)),
            ("<home>", mv(MotionKind::LineStart)),
            ("<end>", mv(MotionKind::LineEnd)),
        ];

        let mut visual = motion_keys();
        visual.extend([
            ("<escape>", CommandKind::ExitToNormal),
            ("v", CommandKind::ToggleVisual(Mode::Visual)),
            ("V", CommandKind::ToggleVisual(Mode::VisualLine)),
            ("o", CommandKind::VisualSwap),
            ("d", CommandKind::VisualOperate(Operator::Delete)),
            ("x", CommandKind::VisualOperate(Operator::Delete)),
            ("<delete>", CommandKind::VisualOperate(Operator::Delete)),
            ("y", CommandKind::VisualOperate(Operator::Yank)),
            ("c", CommandKind::VisualOperate(Operator::Change)),
            ("s", CommandKind::VisualOperate(Operator::Change)),
            ("i", CommandKind::Control(Control::BeginPending('i'))),
            ("a", CommandKind::Control(Control::BeginPending('a'))),
        ]);

        let replace = vec![
            ("<escape>", CommandKind::ExitToNormal),
            ("<backspace>", mv(MotionKind::Left)),
            ("<left>", mv(MotionKind::Left)),
            ("<right>", mv(MotionKind::Right)),
            ("<up>", mv(MotionKind::Up)),
            ("<down>", mv(MotionKind::Down)),
        ];

        Self {
            normal: table(normal),
            insert: table(insert),
            visual: table(visual),
            replace: table(replace),
        }
    }
}
