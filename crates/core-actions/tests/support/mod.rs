#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset.

use core_actions::{DispatchOutcome, Model};
use core_config::{EditorConfig, StartMode};
use core_text::Position;

/// Model in Normal mode holding `text`, cursor at the origin.
pub fn normal(text: &str) -> Model {
    let mut m = Model::new(EditorConfig {
        start_mode: StartMode::Normal,
        ..EditorConfig::default()
    });
    m.set_value(text);
    m.dispatch("g");
    m.dispatch("g");
    m.dispatch("0");
    m
}

/// Model in Insert mode holding `text`, cursor at the end.
pub fn insert(text: &str) -> Model {
    let mut m = Model::new(EditorConfig::default());
    m.set_value(text);
    m
}

pub fn with_config(config: EditorConfig, text: &str) -> Model {
    let mut m = Model::new(config);
    m.set_value(text);
    m
}

/// Dispatch every token, returning the last outcome.
pub fn feed(m: &mut Model, tokens: &[&str]) -> Option<DispatchOutcome> {
    let mut last = None;
    for token in tokens {
        last = Some(m.dispatch(token));
    }
    last
}

/// Dispatch each character of `keys` as its own token.
pub fn typed(m: &mut Model, keys: &str) -> Option<DispatchOutcome> {
    let mut last = None;
    for ch in keys.chars() {
        last = Some(m.dispatch(&ch.to_string()));
    }
    last
}

pub fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

pub fn lines(m: &Model) -> Vec<&str> {
    m.lines().iter().map(String::as_str).collect()
}
