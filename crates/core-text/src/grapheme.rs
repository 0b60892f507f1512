//! Grapheme index arithmetic for a single line of text.
//!
//! Storage is UTF-8 bytes; every caller above this module speaks grapheme
//! indices. Nothing here fails: out-of-range indices clamp, because cursor
//! math elsewhere relies on forgiving bounds.

use crate::egc_width;
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme cluster yielded by the directional iterators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster<'a> {
    /// Grapheme index within the string.
    pub index: usize,
    pub text: &'a str,
    /// Byte offset of the cluster start.
    pub byte: usize,
}

/// Number of grapheme clusters in `s`.
pub fn count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset where grapheme `idx` starts; `idx >= count` maps to `s.len()`.
pub fn to_byte_offset(s: &str, idx: usize) -> usize {
    if idx == 0 {
        return 0;
    }
    s.grapheme_indices(true)
        .nth(idx)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Grapheme index of the cluster containing `byte`. Offsets at or past the
/// end map to `count(s)`.
pub fn to_grapheme_offset(s: &str, byte: usize) -> usize {
    if byte >= s.len() {
        return count(s);
    }
    let mut idx = 0;
    for (i, (start, g)) in s.grapheme_indices(true).enumerate() {
        if byte < start + g.len() {
            return i;
        }
        idx = i + 1;
    }
    idx
}

/// Substring covering graphemes `[start, end)`. `end < start` yields "".
pub fn slice(s: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let a = to_byte_offset(s, start);
    let b = to_byte_offset(s, end);
    &s[a..b]
}

/// Insert `text` before grapheme `idx` (clamped to the end).
pub fn insert_at(s: &str, idx: usize, text: &str) -> String {
    let at = to_byte_offset(s, idx);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..at]);
    out.push_str(text);
    out.push_str(&s[at..]);
    out
}

/// Remove graphemes `[start, end)`.
pub fn delete_range(s: &str, start: usize, end: usize) -> String {
    if end <= start {
        return s.to_string();
    }
    let a = to_byte_offset(s, start);
    let b = to_byte_offset(s, end);
    let mut out = String::with_capacity(s.len() - (b - a));
    out.push_str(&s[..a]);
    out.push_str(&s[b..]);
    out
}

/// Grapheme at index `idx`, if any.
pub fn at(s: &str, idx: usize) -> Option<&str> {
    s.graphemes(true).nth(idx)
}

/// Width in terminal cells of one cluster.
pub fn cluster_width(g: &str) -> usize {
    egc_width(g) as usize
}

/// Width in terminal cells of a whole string.
pub fn str_width(s: &str) -> usize {
    s.graphemes(true).map(cluster_width).sum()
}

/// Display column at which grapheme `idx` starts.
pub fn display_col(s: &str, idx: usize) -> usize {
    s.graphemes(true).take(idx).map(cluster_width).sum()
}

/// Grapheme index whose cells cover display column `col` (clamped to the
/// grapheme count when the line is narrower).
pub fn index_at_display_col(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.graphemes(true).enumerate() {
        let w = cluster_width(g);
        if used + w > col {
            return i;
        }
        used += w;
    }
    count(s)
}

/// Iterate clusters from grapheme `from` (inclusive) towards the end.
pub fn iter_forward(s: &str, from: usize) -> impl Iterator<Item = Cluster<'_>> {
    s.grapheme_indices(true)
        .enumerate()
        .skip(from)
        .map(|(index, (byte, text))| Cluster { index, text, byte })
}

/// Iterate clusters strictly before grapheme `from` towards the start.
pub fn iter_backward(s: &str, from: usize) -> impl Iterator<Item = Cluster<'_>> {
    let clusters: Vec<Cluster<'_>> = s
        .grapheme_indices(true)
        .enumerate()
        .take(from)
        .map(|(index, (byte, text))| Cluster { index, text, byte })
        .collect();
    clusters.into_iter().rev()
}

/// Character class used by word motions and word text objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Word,
    Punct,
}

/// Classify a cluster. Word characters are alphanumerics, `_` and any
/// Unicode letter or number; with `big` every non-blank cluster is `Word`.
pub fn classify(g: &str, big: bool) -> CharClass {
    let Some(c) = g.chars().next() else {
        return CharClass::Blank;
    };
    if c.is_whitespace() {
        CharClass::Blank
    } else if big || c == '_' || c.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn count_mixed_clusters() {
        assert_eq!(count(""), 0);
        assert_eq!(count("abc"), 3);
        assert_eq!(count("e\u{0301}x"), 2);
        assert_eq!(count("a👍🏻b"), 3);
    }

    #[test]
    fn byte_offsets_clamp() {
        let s = "a😀b";
        assert_eq!(to_byte_offset(s, 0), 0);
        assert_eq!(to_byte_offset(s, 1), 1);
        assert_eq!(to_byte_offset(s, 2), 5);
        assert_eq!(to_byte_offset(s, 3), s.len());
        assert_eq!(to_byte_offset(s, 99), s.len());
    }

    #[test]
    fn grapheme_offset_inverse() {
        let s = "a😀b";
        assert_eq!(to_grapheme_offset(s, 0), 0);
        assert_eq!(to_grapheme_offset(s, 1), 1);
        assert_eq!(to_grapheme_offset(s, 3), 1);
        assert_eq!(to_grapheme_offset(s, 5), 2);
        assert_eq!(to_grapheme_offset(s, 6), 3);
    }

    #[test]
    fn slice_reversed_is_empty() {
        assert_eq!(slice("hello", 3, 1), "");
        assert_eq!(slice("hello", 1, 3), "el");
        assert_eq!(slice("hello", 3, 99), "lo");
    }

    #[test]
    fn insert_and_delete_by_index() {
        assert_eq!(insert_at("héllo", 2, "XY"), "héXYllo");
        assert_eq!(insert_at("ab", 9, "c"), "abc");
        assert_eq!(delete_range("h😀llo", 1, 3), "hlo");
        assert_eq!(delete_range("abc", 2, 1), "abc");
    }

    #[test]
    fn widths() {
        assert_eq!(str_width("ab"), 2);
        assert_eq!(str_width("a界"), 3);
        assert_eq!(display_col("a界b", 2), 3);
        assert_eq!(index_at_display_col("a界b", 1), 1);
        assert_eq!(index_at_display_col("a界b", 2), 1);
        assert_eq!(index_at_display_col("a界b", 3), 2);
        assert_eq!(index_at_display_col("ab", 10), 2);
    }

    #[test]
    fn directional_iterators() {
        let s = "ab😀";
        let fwd: Vec<_> = iter_forward(s, 1).map(|c| (c.index, c.text, c.byte)).collect();
        assert_eq!(fwd, vec![(1, "b", 1), (2, "😀", 2)]);
        let back: Vec<_> = iter_backward(s, 2).map(|c| c.index).collect();
        assert_eq!(back, vec![1, 0]);
    }

    #[test]
    fn classification() {
        assert_eq!(classify(" ", false), CharClass::Blank);
        assert_eq!(classify("_", false), CharClass::Word);
        assert_eq!(classify("é", false), CharClass::Word);
        assert_eq!(classify("数", false), CharClass::Word);
        assert_eq!(classify(".", false), CharClass::Punct);
        assert_eq!(classify(".", true), CharClass::Word);
    }

    proptest! {
        #[test]
        fn slice_halves_rejoin(s in "\\PC{0,24}", cut in 0usize..30) {
            let n = count(&s);
            let i = cut.min(n);
            let joined = format!("{}{}", slice(&s, 0, i), slice(&s, i, n));
            prop_assert_eq!(joined, s);
        }

        #[test]
        fn insert_then_delete_restores(s in "[a-zA-Z é😀界_.]{0,16}", t in "[a-z]{1,4}", at in 0usize..20) {
            let i = at.min(count(&s));
            let inserted = insert_at(&s, i, &t);
            prop_assert_eq!(delete_range(&inserted, i, i + count(&t)), s);
        }
    }
}
