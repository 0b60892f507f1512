use std::collections::VecDeque;

use core_text::EditError;
use thiserror::Error;
use tracing::{trace, warn};

/// Default maximum number of commands retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("command was never executed")]
    NotExecuted,
    #[error("command had no effect when executed again")]
    NoEffect,
}

/// An executed command that can be reverted and re-applied against `Ctx`.
///
/// Redo runs the same instance forward again from the starting point it
/// captured, so the result matches the first execution.
pub trait HistoryEntry<Ctx> {
    fn undo(&mut self, ctx: &mut Ctx) -> Result<(), UndoError>;
    fn redo(&mut self, ctx: &mut Ctx) -> Result<(), UndoError>;
}

/// Undo and redo stacks of executed commands.
///
/// A new push clears the redo stack. A failing undo or redo leaves the
/// context as the entry found it and drops the entry.
#[derive(Debug, Clone)]
pub struct CommandHistory<C> {
    undo_stack: VecDeque<C>,
    redo_stack: Vec<C>,
    limit: usize,
}

impl<C> Default for CommandHistory<C> {
    fn default() -> Self {
        Self::with_limit(UNDO_HISTORY_MAX)
    }
}

impl<C> CommandHistory<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// History capped at `limit` entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }

    pub fn push(&mut self, cmd: C) {
        self.undo_stack.push_back(cmd);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", limit = self.limit, "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "push");
    }

    /// Revert the newest command. Returns true when content was restored.
    pub fn undo<Ctx>(&mut self, ctx: &mut Ctx) -> bool
    where
        C: HistoryEntry<Ctx>,
    {
        let Some(mut cmd) = self.undo_stack.pop_back() else {
            return false;
        };
        match cmd.undo(ctx) {
            Ok(()) => {
                self.redo_stack.push(cmd);
                trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
                true
            }
            Err(err) => {
                warn!(target: "state.undo", error = %err, "undo_failed_entry_dropped");
                false
            }
        }
    }

    /// Re-execute the newest undone command. Returns true when it applied.
    pub fn redo<Ctx>(&mut self, ctx: &mut Ctx) -> bool
    where
        C: HistoryEntry<Ctx>,
    {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return false;
        };
        match cmd.redo(ctx) {
            Ok(()) => {
                self.undo_stack.push_back(cmd);
                trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
                true
            }
            Err(err) => {
                warn!(target: "state.undo", error = %err, "redo_failed_entry_dropped");
                false
            }
        }
    }
}
