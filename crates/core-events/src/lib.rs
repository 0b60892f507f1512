//! Canonical key-token vocabulary shared by the input adapter and dispatch.
//!
//! A key token is a plain string. Printable single graphemes are themselves
//! (`"h"`, `"<"`); named keys are bracketed and lower-case with modifiers in
//! `ctrl+alt+shift` order (`"<escape>"`, `"<ctrl+r>"`, `"<alt+enter>"`).
//! Common vim-style aliases (`<Esc>`, `<CR>`, `<C-r>`, `<M-CR>`) are
//! accepted by [`KeyToken::parse`] and rendered back in canonical form by
//! `Display`. Any other multi-grapheme string is literal text (a paste).
//!
//! An unparsed terminal mouse-scroll report (`ESC[<64;x;yM`) is recognized
//! so callers can drop it instead of inserting it as text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u8 {
        const CTRL = 0b0000_0001;
        const ALT = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl ModMask {
    fn write_prefix(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(ModMask::CTRL) {
            f.write_str("ctrl+")?;
        }
        if self.contains(ModMask::ALT) {
            f.write_str("alt+")?;
        }
        if self.contains(ModMask::SHIFT) {
            f.write_str("shift+")?;
        }
        Ok(())
    }

    fn from_alias(name: &str) -> Option<ModMask> {
        match name {
            "ctrl" | "control" | "c" => Some(ModMask::CTRL),
            "alt" | "meta" | "m" | "a" => Some(ModMask::ALT),
            "shift" | "s" => Some(ModMask::SHIFT),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Enter,
    Backspace,
    Delete,
    Tab,
    Space,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

impl NamedKey {
    pub fn name(self) -> String {
        match self {
            NamedKey::Escape => "escape".into(),
            NamedKey::Enter => "enter".into(),
            NamedKey::Backspace => "backspace".into(),
            NamedKey::Delete => "delete".into(),
            NamedKey::Tab => "tab".into(),
            NamedKey::Space => "space".into(),
            NamedKey::Left => "left".into(),
            NamedKey::Right => "right".into(),
            NamedKey::Up => "up".into(),
            NamedKey::Down => "down".into(),
            NamedKey::Home => "home".into(),
            NamedKey::End => "end".into(),
            NamedKey::PageUp => "pageup".into(),
            NamedKey::PageDown => "pagedown".into(),
            NamedKey::Insert => "insert".into(),
            NamedKey::F(n) => format!("f{n}"),
        }
    }

    /// Resolve a lower-cased key name or alias.
    fn from_name(name: &str) -> Option<NamedKey> {
        let key = match name {
            "escape" | "esc" => NamedKey::Escape,
            "enter" | "cr" | "return" | "ret" => NamedKey::Enter,
            "backspace" | "bs" => NamedKey::Backspace,
            "delete" | "del" => NamedKey::Delete,
            "tab" => NamedKey::Tab,
            "space" => NamedKey::Space,
            "left" => NamedKey::Left,
            "right" => NamedKey::Right,
            "up" => NamedKey::Up,
            "down" => NamedKey::Down,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "pageup" => NamedKey::PageUp,
            "pagedown" => NamedKey::PageDown,
            "insert" => NamedKey::Insert,
            other => {
                let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
                if n == 0 {
                    return None;
                }
                NamedKey::F(n)
            }
        };
        Some(key)
    }
}

/// A parsed key token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// One printable grapheme cluster.
    Char(String),
    /// A modified character such as `<ctrl+r>`.
    Chord { ch: char, mods: ModMask },
    /// A named key with optional modifiers.
    Named { key: NamedKey, mods: ModMask },
    /// Literal multi-grapheme text (paste).
    Text(String),
    /// Unparsed terminal mouse-scroll report; never text.
    MouseScroll,
}

static MOUSE_SCROLL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\x1b?\[<6[45];\d+;\d+M$").ok());

/// True when `raw` is an unparsed mouse-scroll escape report.
pub fn is_mouse_scroll(raw: &str) -> bool {
    MOUSE_SCROLL.as_ref().is_some_and(|re| re.is_match(raw))
}

impl KeyToken {
    pub fn named(key: NamedKey) -> Self {
        KeyToken::Named {
            key,
            mods: ModMask::empty(),
        }
    }

    /// Parse a raw token string, accepting canonical forms and aliases.
    pub fn parse(raw: &str) -> KeyToken {
        if is_mouse_scroll(raw) {
            return KeyToken::MouseScroll;
        }
        if raw.len() > 2
            && raw.starts_with('<')
            && raw.ends_with('>')
            && let Some(tok) = parse_bracketed(&raw[1..raw.len() - 1])
        {
            return tok;
        }
        let mut graphemes = raw.graphemes(true);
        match (graphemes.next(), graphemes.next()) {
            (Some(g), None) => match g {
                " " => KeyToken::named(NamedKey::Space),
                "\t" => KeyToken::named(NamedKey::Tab),
                "\r" | "\n" | "\r\n" => KeyToken::named(NamedKey::Enter),
                "\u{1b}" => KeyToken::named(NamedKey::Escape),
                "\u{7f}" => KeyToken::named(NamedKey::Backspace),
                _ => KeyToken::Char(g.to_string()),
            },
            _ => KeyToken::Text(raw.to_string()),
        }
    }

    /// Canonical token string.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Text this token inserts when typed in Insert/Replace mode, if any.
    pub fn printable(&self) -> Option<&str> {
        match self {
            KeyToken::Char(s) => Some(s.as_str()),
            KeyToken::Named {
                key: NamedKey::Space,
                mods,
            } if mods.is_empty() || *mods == ModMask::SHIFT => Some(" "),
            KeyToken::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for bracketed keys (named or chorded).
    pub fn is_named(&self) -> bool {
        matches!(self, KeyToken::Named { .. } | KeyToken::Chord { .. })
    }
}

fn parse_bracketed(inner: &str) -> Option<KeyToken> {
    let parts: Vec<&str> = if inner.len() > 1 && inner.contains('+') {
        inner.split('+').collect()
    } else if inner.len() > 2 && inner.as_bytes().get(1) == Some(&b'-') {
        inner.split('-').collect()
    } else {
        vec![inner]
    };
    let (key, modifiers) = parts.split_last()?;
    let mut mods = ModMask::empty();
    for m in modifiers {
        mods |= ModMask::from_alias(&m.to_ascii_lowercase())?;
    }
    let lower = key.to_ascii_lowercase();
    if let Some(named) = NamedKey::from_name(&lower) {
        return Some(KeyToken::Named { key: named, mods });
    }
    if lower == "lt" {
        return Some(KeyToken::Char("<".into()));
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !mods.is_empty() => {
            let ch = if mods.contains(ModMask::CTRL) { c.to_ascii_lowercase() } else { c };
            Some(KeyToken::Chord { ch, mods })
        }
        (Some(c), None) => Some(KeyToken::Char(c.to_string())),
        _ => {
            trace!(target: "events.token", len = inner.len(), "unknown_bracketed_token");
            None
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(s) | KeyToken::Text(s) => f.write_str(s),
            KeyToken::Chord { ch, mods } => {
                f.write_str("<")?;
                mods.write_prefix(f)?;
                write!(f, "{ch}>")
            }
            KeyToken::Named { key, mods } => {
                f.write_str("<")?;
                mods.write_prefix(f)?;
                write!(f, "{}>", key.name())
            }
            KeyToken::MouseScroll => f.write_str("<mouse-scroll>"),
        }
    }
}

/// Canonicalize a raw token string.
pub fn canonicalize(raw: &str) -> String {
    KeyToken::parse(raw).canonical()
}
