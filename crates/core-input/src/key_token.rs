use core_events::{KeyToken, ModMask, NamedKey};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};
use tracing::trace;

/// Canonical token for a key press or repeat. `None` for releases and for
/// keys with no token (media keys, bare modifiers).
pub fn key_token(event: &CKeyEvent) -> Option<String> {
    if event.kind == CKeyEventKind::Release {
        return None;
    }
    let mods = map_mod_mask(event.modifiers);
    let token = map_key_token(&event.code, mods)?;
    let canonical = token.canonical();
    trace!(target: "input.key", named = token.is_named(), repeat = event.kind == CKeyEventKind::Repeat, "key");
    Some(canonical)
}

/// Convert a crossterm key code plus modifiers into a key token.
///
/// Shift is folded into printable characters (the terminal already reports
/// `'A'` for shift+a) and kept only on named keys. A character with ctrl or
/// alt becomes a chord.
pub fn map_key_token(code: &CKeyCode, mods: ModMask) -> Option<KeyToken> {
    let named = |key| KeyToken::Named { key, mods };
    let token = match code {
        CKeyCode::Char(' ') => named(NamedKey::Space),
        CKeyCode::Char(c) => {
            let chord = mods - ModMask::SHIFT;
            if chord.is_empty() {
                KeyToken::Char(c.to_string())
            } else {
                let ch = if chord.contains(ModMask::CTRL) { c.to_ascii_lowercase() } else { *c };
                KeyToken::Chord { ch, mods: chord }
            }
        }
        CKeyCode::Enter => named(NamedKey::Enter),
        CKeyCode::Esc => named(NamedKey::Escape),
        CKeyCode::Backspace => named(NamedKey::Backspace),
        CKeyCode::Tab => named(NamedKey::Tab),
        CKeyCode::BackTab => KeyToken::Named {
            key: NamedKey::Tab,
            mods: mods | ModMask::SHIFT,
        },
        CKeyCode::Up => named(NamedKey::Up),
        CKeyCode::Down => named(NamedKey::Down),
        CKeyCode::Left => named(NamedKey::Left),
        CKeyCode::Right => named(NamedKey::Right),
        CKeyCode::Home => named(NamedKey::Home),
        CKeyCode::End => named(NamedKey::End),
        CKeyCode::PageUp => named(NamedKey::PageUp),
        CKeyCode::PageDown => named(NamedKey::PageDown),
        CKeyCode::Insert => named(NamedKey::Insert),
        CKeyCode::Delete => named(NamedKey::Delete),
        CKeyCode::F(0) => return None,
        CKeyCode::F(n) => named(NamedKey::F(*n)),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(token)
}

/// Convert crossterm modifier flags into a [`ModMask`]. Meta is treated as
/// alt; super has no token form and is dropped.
pub fn map_mod_mask(mods: CKeyModifiers) -> ModMask {
    let mut out = ModMask::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= ModMask::CTRL;
    }
    if mods.intersects(CKeyModifiers::ALT | CKeyModifiers::META) {
        out |= ModMask::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= ModMask::SHIFT;
    }
    out
}
