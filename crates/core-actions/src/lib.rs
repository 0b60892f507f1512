//! core-actions: the vim-style editing engine.
//!
//! Key tokens flow through [`Model::dispatch`]: pending multi-key sequences
//! are resolved by [`pending`], single keys by the per-mode tables in
//! [`registry`], and the resulting [`Command`] executes against
//! `core_state::EditorState`. Executed content changes are kept in
//! `core_state::CommandHistory` for undo and redo.

pub mod command;
pub mod model;
pub mod pending;
pub mod registry;
pub mod text_object;

pub use command::{
    Command, CommandKind, Control, ExecStatus, InsertEntry, Meta, MotionKind, OpTarget, Operator,
};
pub use model::{DispatchOutcome, ModeChange, Model};
pub use pending::{PendingRegistry, PendingStep};
pub use registry::CommandRegistry;
pub use text_object::{TextObject, TextObjectKind};
