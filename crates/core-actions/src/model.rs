//! The editing engine as seen by an embedding widget.
//!
//! [`Model`] owns the editor state, the command history and any in-flight
//! pending sequence. It turns one key token at a time into a
//! [`DispatchOutcome`] describing what the host should react to: a new
//! value, a mode switch, a submit request, a yank highlight.
//!
//! Dispatch order:
//! 1. mouse-scroll reports are dropped (not handled, never text)
//! 2. an active pending sequence gets the key
//! 3. the canonical token is looked up in the mode's table
//! 4. unmapped printable input types (Insert) or overwrites (Replace)
//! 5. anything else passes through

use std::time::Instant;

use core_config::{EditorConfig, StartMode};
use core_events::KeyToken;
use core_keymap::PendingKeys;
use core_state::{CommandHistory, EditorState, HighlightSpan, Mode, YankRegister, selection};
use core_text::{Position, grapheme, normalize_line_endings};
use tracing::{debug, trace};

use crate::command::{Command, CommandKind, Control, ExecStatus};
use crate::pending::{PendingRegistry, PendingStep};
use crate::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: Mode,
    pub to: Mode,
}

/// What one dispatched token did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: ExecStatus,
    /// False when the host should process the key itself.
    pub handled: bool,
    /// New value after a content change.
    pub content_changed: Option<String>,
    pub mode_changed: Option<ModeChange>,
    /// Value to submit (`<enter>`).
    pub submit_requested: Option<String>,
    /// Region to flash after a yank.
    pub highlight_requested: Option<HighlightSpan>,
}

impl DispatchOutcome {
    fn with_status(status: ExecStatus) -> Self {
        Self {
            status,
            handled: status != ExecStatus::PassThrough,
            content_changed: None,
            mode_changed: None,
            submit_requested: None,
            highlight_requested: None,
        }
    }

    fn pass_through() -> Self {
        Self::with_status(ExecStatus::PassThrough)
    }

    fn consumed() -> Self {
        Self::with_status(ExecStatus::Skipped)
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    state: EditorState,
    history: CommandHistory<Command>,
    pending: PendingKeys,
    config: EditorConfig,
    registry: &'static CommandRegistry,
    sequences: &'static PendingRegistry,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Model {
    pub fn new(config: EditorConfig) -> Self {
        let mode = Self::start_mode(&config);
        debug!(target: "actions.dispatch", modal = config.modal, start = %mode, char_limit = ?config.char_limit, "model_created");
        Self {
            state: EditorState::new(mode, config.char_limit),
            history: CommandHistory::with_limit(config.undo_limit),
            pending: PendingKeys::default(),
            config,
            registry: CommandRegistry::global(),
            sequences: PendingRegistry::global(),
        }
    }

    fn start_mode(config: &EditorConfig) -> Mode {
        match (config.modal, config.start_mode) {
            (true, StartMode::Normal) => Mode::Normal,
            _ => Mode::Insert,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn dispatch(&mut self, token: &str) -> DispatchOutcome {
        self.dispatch_at(token, Instant::now())
    }

    /// Dispatch with an explicit clock, used to timestamp yank highlights.
    pub fn dispatch_at(&mut self, token: &str, now: Instant) -> DispatchOutcome {
        let key = KeyToken::parse(token);
        if key == KeyToken::MouseScroll {
            trace!(target: "actions.dispatch", "mouse_scroll_ignored");
            return DispatchOutcome::pass_through();
        }
        let mode_before = self.state.mode;
        let mut outcome = if self.pending.is_active() {
            self.feed_pending(&key)
        } else {
            self.dispatch_key(&key)
        };
        if self.state.mode != mode_before {
            outcome.mode_changed = Some(ModeChange {
                from: mode_before,
                to: self.state.mode,
            });
        }
        if let Some(span) = self.state.take_highlight_request() {
            self.state.set_highlight(span, now, self.config.yank_highlight);
            outcome.highlight_requested = Some(span);
        }
        outcome
    }

    fn feed_pending(&mut self, key: &KeyToken) -> DispatchOutcome {
        match self.sequences.feed(&mut self.pending, key) {
            PendingStep::Wait | PendingStep::Cancelled => DispatchOutcome::consumed(),
            PendingStep::Resolved(cmd) => self.run(cmd),
            PendingStep::VisualFallback(replay) => {
                self.state.set_mode(Mode::Visual);
                let mut outcome = self.dispatch_key(&KeyToken::parse(&replay));
                outcome.handled = true;
                if outcome.status == ExecStatus::PassThrough {
                    outcome.status = ExecStatus::Executed;
                }
                outcome
            }
        }
    }

    fn dispatch_key(&mut self, key: &KeyToken) -> DispatchOutcome {
        let canonical = key.canonical();
        let mode = if self.config.modal {
            self.state.mode
        } else {
            Mode::Insert
        };
        if let Some(template) = self.registry.get(mode, &canonical) {
            if !self.config.modal && template.meta().mode_change {
                trace!(target: "actions.dispatch", key = %canonical, "mode_change_disabled");
                return DispatchOutcome::pass_through();
            }
            return self.run(template.clone());
        }
        match (mode, key.printable()) {
            (Mode::Insert, Some(text)) => self.run(CommandKind::InsertText(text.to_string()).into()),
            (Mode::Replace, Some(text)) => {
                self.run(CommandKind::OverwriteText(text.to_string()).into())
            }
            _ => {
                let shown = if key.is_named() { canonical.as_str() } else { "<text>" };
                trace!(target: "actions.dispatch", key = shown, mode = %mode, "unmapped");
                DispatchOutcome::pass_through()
            }
        }
    }

    fn run(&mut self, mut cmd: Command) -> DispatchOutcome {
        if let CommandKind::Control(control) = *cmd.kind() {
            return self.control(control);
        }
        let meta = cmd.meta();
        let status = cmd.execute(&mut self.state);
        let mut outcome = DispatchOutcome::with_status(status);
        if status == ExecStatus::Executed && cmd.has_edits() {
            if meta.changes_content {
                outcome.content_changed = Some(self.value());
            }
            if meta.undoable {
                self.history.push(cmd);
            }
        }
        outcome
    }

    fn control(&mut self, control: Control) -> DispatchOutcome {
        match control {
            Control::BeginPending(op) => {
                self.pending.begin(op);
                DispatchOutcome::with_status(ExecStatus::Executed)
            }
            Control::Undo | Control::Redo => {
                let applied = if control == Control::Undo {
                    self.history.undo(&mut self.state)
                } else {
                    self.history.redo(&mut self.state)
                };
                if !applied {
                    return DispatchOutcome::consumed();
                }
                let mut outcome = DispatchOutcome::with_status(ExecStatus::Executed);
                outcome.content_changed = Some(self.value());
                outcome
            }
            Control::Submit => {
                let mut outcome = DispatchOutcome::with_status(ExecStatus::Executed);
                outcome.submit_requested = Some(self.value());
                outcome
            }
        }
    }

    /// Replace the content. Line endings are normalized and the text is cut
    /// to the char limit; history and pending keys are cleared and the
    /// cursor moves to the end.
    pub fn set_value(&mut self, text: &str) {
        let normalized = normalize_line_endings(text);
        let text = match self.config.char_limit {
            Some(limit) => &normalized[..grapheme::to_byte_offset(&normalized, limit)],
            None => normalized.as_str(),
        };
        self.state.buffer.set_text(text);
        self.state.buffer.cursor = self.state.buffer.end();
        self.state.clamp_cursor();
        if self.state.mode.is_visual() {
            self.state.set_mode(Mode::Normal);
        }
        self.history.clear();
        self.pending.clear();
        self.state.clear_highlight();
    }

    pub fn value(&self) -> String {
        self.state.buffer.text()
    }

    pub fn lines(&self) -> &[String] {
        self.state.buffer.lines()
    }

    /// Empty content, start mode, empty history and register.
    pub fn reset(&mut self) {
        self.state = EditorState::new(Self::start_mode(&self.config), self.config.char_limit);
        self.history.clear();
        self.pending.clear();
    }

    pub fn cursor(&self) -> Position {
        self.state.cursor()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn register(&self) -> &YankRegister {
        &self.state.register
    }

    /// True while an operator waits for more keys.
    pub fn is_pending(&self) -> bool {
        self.pending.is_active()
    }

    pub fn highlight_at(&self, now: Instant) -> Option<HighlightSpan> {
        self.state.highlight_at(now)
    }

    /// Normalized selection in Visual/VisualLine mode (inclusive end).
    pub fn visual_bounds(&self) -> Option<(Position, Position)> {
        if !self.state.mode.is_visual() {
            return None;
        }
        let anchor = self.state.visual_anchor?;
        Some(selection::bounds(
            anchor,
            self.state.cursor(),
            self.state.mode,
            &self.state.buffer,
        ))
    }

    /// Text covered by the current selection.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.visual_bounds()?;
        Some(selection::selected_text(&self.state.buffer, start, end))
    }
}
