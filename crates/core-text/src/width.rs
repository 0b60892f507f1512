//! Grapheme cluster display width.
//!
//! `egc_width` is the single authoritative answer to "how many terminal
//! cells does this cluster occupy". Cursor column math, sticky vertical
//! motion columns and any external renderer all go through it so they never
//! disagree about where a cluster ends.
//!
//! Precedence:
//! 1. Classifier (semantic kind -> width mapping).
//! 2. Conservative widen fallback (pictographic signal but width == 1).
//!
//! The classifier is biased toward over-estimating width for emoji
//! composites. Over-estimation leaves a blank cell; under-estimation makes
//! the cursor drift against what the terminal actually painted.

use unicode_width::UnicodeWidthChar;

/// Semantic classification of a single grapheme cluster (EGC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    Emoji,
    /// Base + combining mark(s); bool is true when the base is wide or pictographic.
    Combining(bool),
}

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Rough Extended Pictographic heuristic (emoji blocks + legacy misc symbols).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_is_wide(c: char) -> bool {
    c.width().unwrap_or(1) == 2
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Narrow;
    };
    if chars.next().is_none() {
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        if is_extended_pictographic(first) || char_is_wide(first) {
            return EgcKind::Wide;
        }
        return EgcKind::Narrow;
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut any_wide = false;
    let mut base_wide = false;
    let mut saw_base = false;
    let mut last = first;
    for c in egc.chars() {
        if is_extended_pictographic(c) {
            pictographic += 1;
        }
        if is_regional_indicator(c) {
            regional += 1;
        }
        has_zwj |= c == ZWJ;
        has_skin |= is_skin_tone_modifier(c);
        has_combining |= is_combining_mark(c);
        any_wide |= char_is_wide(c);
        if !saw_base && !is_combining_mark(c) {
            saw_base = true;
            base_wide = is_extended_pictographic(c) || char_is_wide(c);
        }
        last = c;
    }

    // Keycap (digit/#/* + optional VS16 + U+20E3), flag pairs, ZWJ sequences
    // and skin-tone modified emoji all render as one double-width glyph.
    let keycap = last == KEYCAP_COMBINING
        && matches!(first, '0'..='9' | '#' | '*');
    if keycap || regional == 2 || (has_zwj && pictographic >= 2) {
        return EgcKind::Emoji;
    }
    if pictographic >= 1 && (has_skin || !has_zwj) {
        return EgcKind::Emoji;
    }
    if has_combining {
        return EgcKind::Combining(base_wide);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    EgcKind::Narrow
}

fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Ascii | EgcKind::Narrow | EgcKind::Combining(false) => 1,
        EgcKind::Wide | EgcKind::Emoji | EgcKind::Combining(true) => 2,
    }
}

/// Return the display column width for a single grapheme cluster (EGC).
///
/// Precondition: `egc` is exactly one grapheme cluster; callers segment
/// first. Empty input returns 0. Control characters (tab included) count as
/// a single cell so cursor math stays monotonic.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let mut width = width_for_kind(classify(egc));
    if width == 1
        && egc
            .chars()
            .any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        width = 2;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width("~"), 1);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(egc_width("界"), 2);
    }

    #[test]
    fn emoji_basic() {
        assert_eq!(egc_width("😀"), 2);
    }

    #[test]
    fn combining_acute() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }

    #[test]
    fn emoji_flag() {
        assert_eq!(egc_width("🇺🇸"), 2);
    }

    #[test]
    fn emoji_keycap() {
        assert_eq!(egc_width("1\u{FE0F}\u{20E3}"), 2);
        assert_eq!(egc_width("2\u{20E3}"), 2);
    }

    #[test]
    fn emoji_zwj_family() {
        assert_eq!(egc_width("👨\u{200D}👩\u{200D}👧"), 2);
    }

    #[test]
    fn emoji_skin_tone() {
        assert_eq!(egc_width("👍🏻"), 2);
    }

    #[test]
    fn single_regional_indicator_widened() {
        assert_eq!(egc_width("🇺"), 2);
    }

    #[test]
    fn wide_base_with_combining_mark() {
        assert_eq!(egc_width("界\u{0301}"), 2);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(egc_width(""), 0);
    }
}
