//! Configuration loading and parsing.
//!
//! Parses `vimline.toml` (or an override path provided by the binary) and
//! extracts the `[editor]` table. Every field is optional; absent fields take
//! their defaults. Unknown fields are ignored (TOML deserialization
//! tolerance). An unreadable or malformed file falls back to defaults with a
//! warning rather than failing startup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "vimline.toml";

/// Mode the editor starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    Normal,
    #[default]
    Insert,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorSection {
    #[serde(default = "EditorSection::default_modal")]
    pub modal: bool,
    #[serde(default)]
    pub start_mode: StartMode,
    /// Maximum grapheme total; 0 means unlimited.
    #[serde(default)]
    pub char_limit: usize,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default = "EditorSection::default_yank_highlight_ms")]
    pub yank_highlight_ms: u64,
    #[serde(default = "EditorSection::default_undo_limit")]
    pub undo_limit: usize,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            modal: Self::default_modal(),
            start_mode: StartMode::default(),
            char_limit: 0,
            placeholder: String::new(),
            yank_highlight_ms: Self::default_yank_highlight_ms(),
            undo_limit: Self::default_undo_limit(),
        }
    }
}

impl EditorSection {
    const fn default_modal() -> bool {
        true
    }
    const fn default_yank_highlight_ms() -> u64 {
        150
    }
    const fn default_undo_limit() -> usize {
        200
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorSection,
}

/// Construction-time options for the editing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// When false the widget behaves as a plain single-mode text field.
    pub modal: bool,
    pub start_mode: StartMode,
    /// Grapheme clusters including one per line separator; `None` is unlimited.
    pub char_limit: Option<usize>,
    /// Rendering concern only; carried for the embedding widget.
    pub placeholder: String,
    pub yank_highlight: Duration,
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorSection::default().into()
    }
}

impl From<EditorSection> for EditorConfig {
    fn from(s: EditorSection) -> Self {
        Self {
            modal: s.modal,
            start_mode: s.start_mode,
            char_limit: (s.char_limit > 0).then_some(s.char_limit),
            placeholder: s.placeholder,
            yank_highlight: Duration::from_millis(s.yank_highlight_ms),
            undo_limit: s.undo_limit.max(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

impl Config {
    /// Resolved editor options.
    pub fn editor(&self) -> EditorConfig {
        let section = self.file.editor.clone();
        if section.undo_limit == 0 {
            info!(target: "config", raw = 0, clamped = 1, "undo_limit_clamped");
        }
        section.into()
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimline").join(CONFIG_FILE_NAME);
    }
    local
}

fn read_and_parse(path: &Path) -> Result<(String, ConfigFile)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let file = toml::from_str::<ConfigFile>(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok((content, file))
}

/// Load configuration from `path` (or the discovered location). Missing or
/// invalid files yield defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if !path.exists() {
        debug!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    }
    match read_and_parse(&path) {
        Ok((raw, file)) => {
            debug!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(raw),
                file,
            })
        }
        Err(err) => {
            warn!(target: "config", error = %format!("{err:#}"), "config_invalid_using_defaults");
            Ok(Config::default())
        }
    }
}
