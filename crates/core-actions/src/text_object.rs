//! Text objects (`iw`, `a"`, `i(`, ...).
//!
//! A text object resolves to an inclusive [`Span`] relative to the cursor, or
//! `None` when the cursor is not inside one. A span with `end < start` is a
//! found-but-empty object (`""`, `()`): change commands still enter Insert
//! at `start`, delete and yank have nothing to act on.
//!
//! Scope:
//! * Words and WORDs resolve within the cursor line.
//! * Quotes resolve within the cursor line and honor backslash escapes (an
//!   odd run of preceding backslashes escapes the quote).
//! * Brackets may span lines and nest. They do not honor escapes.
//! * Inner bracket objects are not trimmed to whole lines.

use core_text::grapheme::{self, CharClass};
use core_text::{Position, Span, TextBuffer};
use tracing::trace;

/// A selectable region around the cursor.
pub trait TextObject {
    /// Identifier used in traces.
    fn name(&self) -> &'static str;
    /// Resolve the object at `cursor`. `inner` excludes delimiters (and, for
    /// words, surrounding whitespace).
    fn find_bounds(&self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span>;
}

/// Object keys accepted after `i` / `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextObjectKind {
    Word,
    BigWord,
    Quote(char),
    Bracket(char, char),
    /// Innermost of `()`, `[]` and `{}`.
    AnyBracket,
}

impl TextObjectKind {
    /// Every key that names an object, for building pending tables.
    pub const KEYS: [&'static str; 15] = [
        "w", "W", "\"", "'", "`", "(", ")", "[", "]", "{", "}", "<", ">", "b", "B",
    ];

    pub fn from_key(key: &str) -> Option<TextObjectKind> {
        let kind = match key {
            "w" => TextObjectKind::Word,
            "W" => TextObjectKind::BigWord,
            "\"" => TextObjectKind::Quote('"'),
            "'" => TextObjectKind::Quote('\''),
            "`" => TextObjectKind::Quote('`'),
            "(" | ")" => TextObjectKind::Bracket('(', ')'),
            "[" | "]" => TextObjectKind::Bracket('[', ']'),
            "{" | "}" => TextObjectKind::Bracket('{', '}'),
            "<" | ">" => TextObjectKind::Bracket('<', '>'),
            "b" | "B" => TextObjectKind::AnyBracket,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        self.as_object().name()
    }

    pub fn find_bounds(self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span> {
        let found = self.as_object().find_bounds(buffer, cursor, inner);
        trace!(target: "actions.dispatch", object = self.name(), inner, found = found.is_some(), "text_object");
        found
    }

    fn as_object(self) -> Box<dyn TextObject> {
        match self {
            TextObjectKind::Word => Box::new(Word { big: false }),
            TextObjectKind::BigWord => Box::new(Word { big: true }),
            TextObjectKind::Quote(quote) => Box::new(Delimiter { quote }),
            TextObjectKind::Bracket(open, close) => Box::new(Bracket { open, close }),
            TextObjectKind::AnyBracket => Box::new(AnyBracket),
        }
    }
}

fn clusters(line: &str) -> Vec<&str> {
    grapheme::iter_forward(line, 0).map(|c| c.text).collect()
}

fn is_char(g: &str, ch: char) -> bool {
    let mut chars = g.chars();
    chars.next() == Some(ch) && chars.next().is_none()
}

/// `w` / `W`.
#[derive(Debug, Clone, Copy)]
pub struct Word {
    pub big: bool,
}

impl Word {
    /// Extent of the same-class run containing `idx`.
    fn run(&self, gs: &[&str], idx: usize) -> (usize, usize) {
        let class = grapheme::classify(gs[idx], self.big);
        let mut start = idx;
        while start > 0 && grapheme::classify(gs[start - 1], self.big) == class {
            start -= 1;
        }
        let mut end = idx;
        while end + 1 < gs.len() && grapheme::classify(gs[end + 1], self.big) == class {
            end += 1;
        }
        (start, end)
    }

    fn is_blank(&self, g: &str) -> bool {
        grapheme::classify(g, self.big) == CharClass::Blank
    }
}

impl TextObject for Word {
    fn name(&self) -> &'static str {
        if self.big { "big-word" } else { "word" }
    }

    fn find_bounds(&self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span> {
        if cursor.row >= buffer.line_count() {
            return None;
        }
        let gs = clusters(buffer.line(cursor.row));
        if cursor.col >= gs.len() || gs.iter().all(|g| self.is_blank(g)) {
            return None;
        }
        let on_blank = self.is_blank(gs[cursor.col]);
        if on_blank && !self.big {
            return None;
        }
        let (mut start, mut end) = self.run(&gs, cursor.col);
        if on_blank {
            // WORD on whitespace: the blank run, plus the following WORD for `aW`.
            if !inner && end + 1 < gs.len() {
                end = self.run(&gs, end + 1).1;
            }
        } else if !inner {
            if end + 1 < gs.len() && self.is_blank(gs[end + 1]) {
                end = self.run(&gs, end + 1).1;
            } else if start > 0 && self.is_blank(gs[start - 1]) {
                start = self.run(&gs, start - 1).0;
            }
        }
        Some(Span::new(
            Position::new(cursor.row, start),
            Position::new(cursor.row, end),
        ))
    }
}

/// Quote pair (`"`, `'`, `` ` ``) on the cursor line.
#[derive(Debug, Clone, Copy)]
pub struct Delimiter {
    pub quote: char,
}

fn escaped(gs: &[&str], idx: usize) -> bool {
    gs[..idx].iter().rev().take_while(|g| **g == "\\").count() % 2 == 1
}

impl TextObject for Delimiter {
    fn name(&self) -> &'static str {
        "quote"
    }

    fn find_bounds(&self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span> {
        if cursor.row >= buffer.line_count() {
            return None;
        }
        let gs = clusters(buffer.line(cursor.row));
        let quotes: Vec<usize> = (0..gs.len())
            .filter(|&i| is_char(gs[i], self.quote) && !escaped(&gs, i))
            .collect();
        let (open, close) = match quotes.iter().position(|&q| q == cursor.col) {
            // On a quote: its parity decides whether it opens or closes.
            Some(k) if k % 2 == 0 => match quotes.get(k + 1) {
                Some(&close) => (quotes[k], close),
                None if k > 0 => (quotes[k - 1], quotes[k]),
                None => return None,
            },
            Some(k) => (quotes[k - 1], quotes[k]),
            None => {
                let open = quotes.iter().rev().find(|&&q| q < cursor.col)?;
                let close = quotes.iter().find(|&&q| q > cursor.col)?;
                (*open, *close)
            }
        };
        let row = cursor.row;
        if inner {
            // Adjacent quotes give `end < start`.
            Some(Span::new(Position::new(row, open + 1), Position::new(row, close - 1)))
        } else {
            Some(Span::new(Position::new(row, open), Position::new(row, close)))
        }
    }
}

/// Bracket pair with nesting, searched across lines.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub open: char,
    pub close: char,
}

impl Bracket {
    fn find_open(&self, lines: &[Vec<&str>], cursor: Position) -> Option<Position> {
        if lines[cursor.row].get(cursor.col).is_some_and(|g| is_char(g, self.open)) {
            return Some(cursor);
        }
        let mut depth = 0usize;
        let mut row = cursor.row;
        let mut limit = cursor.col;
        loop {
            for col in (0..limit).rev() {
                let g = lines[row][col];
                if is_char(g, self.close) {
                    depth += 1;
                } else if is_char(g, self.open) {
                    if depth == 0 {
                        return Some(Position::new(row, col));
                    }
                    depth -= 1;
                }
            }
            if row == 0 {
                return None;
            }
            row -= 1;
            limit = lines[row].len();
        }
    }

    fn find_close(&self, lines: &[Vec<&str>], open: Position) -> Option<Position> {
        let mut depth = 0usize;
        let mut from = open.col + 1;
        for (row, gs) in lines.iter().enumerate().skip(open.row) {
            for (col, g) in gs.iter().enumerate().skip(from) {
                if is_char(g, self.open) {
                    depth += 1;
                } else if is_char(g, self.close) {
                    if depth == 0 {
                        return Some(Position::new(row, col));
                    }
                    depth -= 1;
                }
            }
            from = 0;
        }
        None
    }

    fn pair(&self, buffer: &TextBuffer, cursor: Position) -> Option<(Position, Position)> {
        if cursor.row >= buffer.line_count() || cursor.col > buffer.line_len(cursor.row) {
            return None;
        }
        let lines: Vec<Vec<&str>> = buffer.lines().iter().map(|l| clusters(l)).collect();
        let open = self.find_open(&lines, cursor)?;
        let close = self.find_close(&lines, open)?;
        Some((open, close))
    }
}

impl TextObject for Bracket {
    fn name(&self) -> &'static str {
        "bracket"
    }

    fn find_bounds(&self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span> {
        let (open, close) = self.pair(buffer, cursor)?;
        if !inner {
            return Some(Span::new(open, close));
        }
        if open.row == close.row && close.col == open.col + 1 {
            return Some(Span::new(close, open));
        }
        Some(Span::new(buffer.next_position(open), buffer.prev_position(close)))
    }
}

/// Innermost enclosing `()`, `[]` or `{}`.
#[derive(Debug, Clone, Copy)]
pub struct AnyBracket;

const ANY_BRACKETS: [Bracket; 3] = [
    Bracket { open: '(', close: ')' },
    Bracket { open: '[', close: ']' },
    Bracket { open: '{', close: '}' },
];

impl TextObject for AnyBracket {
    fn name(&self) -> &'static str {
        "any-bracket"
    }

    fn find_bounds(&self, buffer: &TextBuffer, cursor: Position, inner: bool) -> Option<Span> {
        let innermost = ANY_BRACKETS
            .iter()
            .filter_map(|b| b.pair(buffer, cursor).map(|(open, _)| (open, b)))
            .max_by_key(|(open, _)| *open)?;
        innermost.1.find_bounds(buffer, cursor, inner)
    }
}
