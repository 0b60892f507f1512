//! Multi-key sequences after an operator key (`dw`, `ci"`, `gg`, `viw`, `rx`).
//!
//! Each operator owns a [`SequenceTrie`] of the keys that may follow it.
//! [`PendingRegistry::feed`] appends one key to the in-flight
//! [`PendingKeys`] and reports what the dispatcher should do next. `r` is
//! not trie-driven: its single argument is any printable grapheme.

use std::collections::HashMap;
use std::sync::LazyLock;

use core_events::{KeyToken, NamedKey};
use core_keymap::{Lookup, PendingKeys, SequenceTrie};
use tracing::trace;

use crate::command::{Command, CommandKind, MotionKind, OpTarget, Operator};
use crate::text_object::TextObjectKind;

/// What to do with a key fed to an active pending sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingStep {
    /// Sequence incomplete; keep waiting.
    Wait,
    /// Sequence named a command; pending state is cleared.
    Resolved(Command),
    /// No sequence matched; pending state is cleared.
    Cancelled,
    /// `v` followed by something that is not an object: enter Visual and
    /// dispatch this key there.
    VisualFallback(String),
}

#[derive(Debug, Clone)]
pub struct PendingRegistry {
    tables: HashMap<char, SequenceTrie<Command>>,
}

static PENDING: LazyLock<PendingRegistry> = LazyLock::new(PendingRegistry::build);

/// `i<obj>` and `a<obj>` sequences, or bare `<obj>` when `prefixed` is
/// false (the `i`/`a` key already began the sequence).
fn object_sequences(
    prefixed: bool,
    make: impl Fn(TextObjectKind, bool) -> CommandKind,
) -> Vec<(Vec<&'static str>, Command)> {
    let mut out = Vec::new();
    for key in TextObjectKind::KEYS {
        let Some(object) = TextObjectKind::from_key(key) else {
            continue;
        };
        if prefixed {
            out.push((vec!["i", key], Command::new(make(object, true))));
            out.push((vec!["a", key], Command::new(make(object, false))));
        } else {
            out.push((vec![key], Command::new(make(object, true))));
        }
    }
    out
}

fn operator_sequences(op: Operator, doubled: &'static str) -> Vec<(Vec<&'static str>, Command)> {
    let motions = [
        ("h", MotionKind::Left),
        ("l", MotionKind::Right),
        ("j", MotionKind::Down),
        ("k", MotionKind::Up),
        ("w", MotionKind::WordForward { big: false }),
        ("W", MotionKind::WordForward { big: true }),
        ("b", MotionKind::WordBackward { big: false }),
        ("B", MotionKind::WordBackward { big: true }),
        ("e", MotionKind::WordEnd { big: false }),
        ("E", MotionKind::WordEnd { big: true }),
        ("0", MotionKind::LineStart),
        ("^", MotionKind::FirstNonBlank),
        ("$", MotionKind::LineEnd),
        ("G", MotionKind::BufferEnd),
    ];
    let make = |target| Command::new(CommandKind::Operate { op, target });
    let mut out: Vec<(Vec<&'static str>, Command)> = motions
        .into_iter()
        .map(|(key, motion)| (vec![key], make(OpTarget::Motion(motion))))
        .collect();
    out.push((vec!["g", "g"], make(OpTarget::Motion(MotionKind::BufferStart))));
    out.push((vec![doubled], make(OpTarget::Line)));
    out.extend(object_sequences(true, |object, inner| CommandKind::Operate {
        op,
        target: OpTarget::Object { object, inner },
    }));
    out
}

impl PendingRegistry {
    /// Shared default tables.
    pub fn global() -> &'static PendingRegistry {
        &PENDING
    }

    fn build() -> Self {
        let mut tables = HashMap::new();
        tables.insert('d', SequenceTrie::build(operator_sequences(Operator::Delete, "d")));
        tables.insert('c', SequenceTrie::build(operator_sequences(Operator::Change, "c")));
        tables.insert('y', SequenceTrie::build(operator_sequences(Operator::Yank, "y")));
        tables.insert(
            'g',
            SequenceTrie::build([(vec!["g"], Command::new(CommandKind::Move(MotionKind::BufferStart)))]),
        );
        let select = |object, inner| CommandKind::SelectObject { object, inner };
        tables.insert('v', SequenceTrie::build(object_sequences(true, select)));
        tables.insert('i', SequenceTrie::build(object_sequences(false, select)));
        tables.insert(
            'a',
            SequenceTrie::build(object_sequences(false, |object, _| select(object, false))),
        );
        Self { tables }
    }

    pub fn lookup(&self, operator: char, keys: &[String]) -> Lookup<'_, Command> {
        match self.tables.get(&operator) {
            Some(trie) => trie.lookup(keys),
            None => Lookup::NoMatch,
        }
    }

    /// Feed `key` to the active sequence in `pending`.
    pub fn feed(&self, pending: &mut PendingKeys, key: &KeyToken) -> PendingStep {
        let Some(operator) = pending.operator else {
            return PendingStep::Cancelled;
        };
        if operator == 'r' {
            pending.clear();
            return match key.printable() {
                Some(g) if !matches!(key, KeyToken::Text(_)) => {
                    trace!(target: "actions.pending", operator = %operator, "replace_resolved");
                    PendingStep::Resolved(Command::new(CommandKind::ReplaceUnder(g.to_string())))
                }
                _ => {
                    trace!(target: "actions.pending", operator = %operator, "cancelled");
                    PendingStep::Cancelled
                }
            };
        }
        let canonical = key.canonical();
        let is_escape = matches!(
            key,
            KeyToken::Named {
                key: NamedKey::Escape,
                ..
            }
        );
        pending.push(&canonical);
        let step = if is_escape {
            PendingStep::Cancelled
        } else {
            match self.lookup(operator, &pending.keys) {
                Lookup::Exact(cmd) => PendingStep::Resolved(cmd.clone()),
                Lookup::Prefix => PendingStep::Wait,
                Lookup::NoMatch if operator == 'v' => PendingStep::VisualFallback(canonical),
                Lookup::NoMatch => PendingStep::Cancelled,
            }
        };
        trace!(target: "actions.pending", operator = %operator, keys = pending.keys.len(), step = step_name(&step), "feed");
        if step != PendingStep::Wait {
            pending.clear();
        }
        step
    }
}

fn step_name(step: &PendingStep) -> &'static str {
    match step {
        PendingStep::Wait => "wait",
        PendingStep::Resolved(_) => "resolved",
        PendingStep::Cancelled => "cancelled",
        PendingStep::VisualFallback(_) => "visual_fallback",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed_all(operator: char, keys: &[&str]) -> PendingStep {
        let mut pending = PendingKeys::default();
        pending.begin(operator);
        let mut step = PendingStep::Wait;
        for key in keys {
            step = PendingRegistry::global().feed(&mut pending, &KeyToken::parse(key));
        }
        step
    }

    fn resolved_kind(step: PendingStep) -> Option<CommandKind> {
        match step {
            PendingStep::Resolved(cmd) => Some(cmd.kind().clone()),
            _ => None,
        }
    }

    #[test]
    fn doubled_operator_is_linewise() {
        assert_eq!(
            resolved_kind(feed_all('d', &["d"])),
            Some(CommandKind::Operate { op: Operator::Delete, target: OpTarget::Line })
        );
        assert_eq!(resolved_kind(feed_all('y', &["d"])), None);
    }

    #[test]
    fn gg_waits_then_resolves() {
        assert_eq!(feed_all('d', &["g"]), PendingStep::Wait);
        assert_eq!(
            resolved_kind(feed_all('d', &["g", "g"])),
            Some(CommandKind::Operate {
                op: Operator::Delete,
                target: OpTarget::Motion(MotionKind::BufferStart)
            })
        );
    }

    #[test]
    fn object_after_inner_prefix() {
        assert_eq!(
            resolved_kind(feed_all('c', &["i", "\""])),
            Some(CommandKind::Operate {
                op: Operator::Change,
                target: OpTarget::Object { object: TextObjectKind::Quote('"'), inner: true }
            })
        );
    }

    #[test]
    fn escape_cancels_even_for_v() {
        assert_eq!(feed_all('d', &["<esc>"]), PendingStep::Cancelled);
        assert_eq!(feed_all('v', &["<escape>"]), PendingStep::Cancelled);
    }

    #[test]
    fn v_falls_back_to_visual_with_the_key() {
        assert_eq!(feed_all('v', &["w"]), PendingStep::VisualFallback("w".into()));
        assert_eq!(
            resolved_kind(feed_all('v', &["a", "("])),
            Some(CommandKind::SelectObject {
                object: TextObjectKind::Bracket('(', ')'),
                inner: false
            })
        );
    }

    #[test]
    fn visual_object_prefixes() {
        assert_eq!(
            resolved_kind(feed_all('i', &["w"])),
            Some(CommandKind::SelectObject { object: TextObjectKind::Word, inner: true })
        );
        assert_eq!(feed_all('a', &["z"]), PendingStep::Cancelled);
    }

    #[test]
    fn replace_takes_one_printable_key() {
        assert_eq!(
            resolved_kind(feed_all('r', &["x"])),
            Some(CommandKind::ReplaceUnder("x".into()))
        );
        assert_eq!(
            resolved_kind(feed_all('r', &["<space>"])),
            Some(CommandKind::ReplaceUnder(" ".into()))
        );
        assert_eq!(feed_all('r', &["<escape>"]), PendingStep::Cancelled);
        assert_eq!(feed_all('r', &["<enter>"]), PendingStep::Cancelled);
    }

    #[test]
    fn pending_state_clears_after_resolution() {
        let mut pending = PendingKeys::default();
        pending.begin('d');
        PendingRegistry::global().feed(&mut pending, &KeyToken::parse("w"));
        assert!(!pending.is_active());
    }
}
