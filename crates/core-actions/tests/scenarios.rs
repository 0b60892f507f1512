mod support;
use support::*;

use core_actions::{ExecStatus, ModeChange};
use core_config::EditorConfig;
use core_state::Mode;
use pretty_assertions::assert_eq;

#[test]
fn delete_word_then_undo() {
    let mut m = normal("hello world");
    let out = typed(&mut m, "dw").unwrap();
    assert_eq!(m.value(), "world");
    assert_eq!(m.cursor(), pos(0, 0));
    assert_eq!(out.content_changed.as_deref(), Some("world"));
    let out = m.dispatch("u");
    assert_eq!(m.value(), "hello world");
    assert_eq!(m.cursor(), pos(0, 0));
    assert_eq!(out.content_changed.as_deref(), Some("hello world"));
}

#[test]
fn insert_text_and_alt_enter_newline() {
    let mut m = insert("");
    feed(&mut m, &["H", "i", "<alt+enter>", "!"]);
    assert_eq!(lines(&m), vec!["Hi", "!"]);
    assert_eq!(m.cursor(), pos(1, 1));
}

#[test]
fn dd_on_middle_line() {
    let mut m = normal("line1\nline2\nline3");
    typed(&mut m, "jdd");
    assert_eq!(lines(&m), vec!["line1", "line3"]);
    assert_eq!(m.cursor().row, 1);
}

#[test]
fn dj_from_first_line() {
    let mut m = normal("line1\nline2\nline3");
    typed(&mut m, "dj");
    assert_eq!(lines(&m), vec!["line3"]);
}

#[test]
fn deleting_every_line_leaves_one_empty_line() {
    let mut m = normal("a\nb\nc");
    typed(&mut m, "dGdd");
    assert_eq!(lines(&m), vec![""]);
    assert_eq!(m.cursor(), pos(0, 0));
}

#[test]
fn char_limit_skips_insertion() {
    let mut m = with_config(
        EditorConfig {
            char_limit: Some(5),
            ..EditorConfig::default()
        },
        "hello",
    );
    let out = m.dispatch("!");
    assert_eq!(out.status, ExecStatus::Skipped);
    assert!(out.handled);
    assert_eq!(out.content_changed, None);
    assert_eq!(m.value(), "hello");
}

#[test]
fn char_limit_counts_line_breaks() {
    let mut m = with_config(
        EditorConfig {
            char_limit: Some(3),
            ..EditorConfig::default()
        },
        "ab",
    );
    assert_eq!(m.dispatch("<alt+enter>").status, ExecStatus::Executed);
    assert_eq!(m.dispatch("c").status, ExecStatus::Skipped);
    assert_eq!(lines(&m), vec!["ab", ""]);
}

#[test]
fn escape_leaves_insert_and_reports_mode_change() {
    let mut m = insert("abc");
    let out = m.dispatch("<esc>");
    assert_eq!(
        out.mode_changed,
        Some(ModeChange {
            from: Mode::Insert,
            to: Mode::Normal
        })
    );
    assert_eq!(m.cursor(), pos(0, 2));
}

#[test]
fn escape_in_normal_passes_through() {
    let mut m = normal("abc");
    let out = m.dispatch("<escape>");
    assert_eq!(out.status, ExecStatus::PassThrough);
    assert!(!out.handled);
}

#[test]
fn unmapped_normal_key_passes_through() {
    let mut m = normal("abc");
    let out = m.dispatch("<f5>");
    assert!(!out.handled);
    assert_eq!(m.value(), "abc");
}

#[test]
fn enter_requests_submit_without_editing() {
    let mut m = insert("one\ntwo");
    let out = m.dispatch("<enter>");
    assert_eq!(out.submit_requested.as_deref(), Some("one\ntwo"));
    assert_eq!(out.content_changed, None);
    assert_eq!(m.value(), "one\ntwo");
}

#[test]
fn modal_disabled_keeps_insert_mode() {
    let mut m = with_config(
        EditorConfig {
            modal: false,
            ..EditorConfig::default()
        },
        "",
    );
    let out = m.dispatch("<escape>");
    assert_eq!(out.status, ExecStatus::PassThrough);
    assert_eq!(m.mode(), Mode::Insert);
    typed(&mut m, "dw");
    assert_eq!(m.value(), "dw");
}

#[test]
fn mouse_scroll_is_never_text() {
    let mut m = insert("");
    let out = m.dispatch("\u{1b}[<64;12;4M");
    assert!(!out.handled);
    let out = m.dispatch("[<65;1;1M");
    assert!(!out.handled);
    assert_eq!(m.value(), "");
}

#[test]
fn paste_token_inserts_normalized_text() {
    let mut m = insert("");
    m.dispatch("one\r\ntwo");
    assert_eq!(lines(&m), vec!["one", "two"]);
    assert_eq!(m.cursor(), pos(1, 3));
}

#[test]
fn change_word_enters_insert_and_types() {
    let mut m = normal("foo bar");
    typed(&mut m, "cwbaz");
    assert_eq!(m.value(), "baz bar");
    assert_eq!(m.mode(), Mode::Insert);
    m.dispatch("<escape>");
    m.dispatch("u");
    assert_eq!(m.value(), "ba bar");
}

#[test]
fn yank_and_paste_line() {
    let mut m = normal("one\ntwo");
    let out = typed(&mut m, "yy").unwrap();
    let span = out.highlight_requested.unwrap();
    assert!(span.linewise);
    typed(&mut m, "jp");
    assert_eq!(lines(&m), vec!["one", "two", "one"]);
    assert_eq!(m.cursor(), pos(2, 0));
    assert_eq!(m.undo_depth(), 1);
}

#[test]
fn yank_highlight_expires() {
    let mut m = normal("word");
    let now = std::time::Instant::now();
    m.dispatch_at("y", now);
    m.dispatch_at("w", now);
    assert!(m.highlight_at(now).is_some());
    let later = now + EditorConfig::default().yank_highlight;
    assert!(m.highlight_at(later).is_none());
    assert_eq!(m.register().text, "word");
}

#[test]
fn replace_char_with_r() {
    let mut m = normal("cat");
    typed(&mut m, "rb");
    assert_eq!(m.value(), "bat");
    feed(&mut m, &["l", "r", "<space>"]);
    assert_eq!(m.value(), "b t");
    feed(&mut m, &["r", "<escape>"]);
    assert_eq!(m.value(), "b t");
    assert!(!m.is_pending());
}

#[test]
fn replace_mode_overwrites_then_appends() {
    let mut m = normal("abc");
    typed(&mut m, "lRxyz");
    assert_eq!(m.value(), "axyz");
    m.dispatch("<backspace>");
    assert_eq!(m.cursor(), pos(0, 3));
    m.dispatch("<escape>");
    assert_eq!(m.mode(), Mode::Normal);
}

#[test]
fn open_line_below_and_type() {
    let mut m = normal("first");
    typed(&mut m, "onext");
    assert_eq!(lines(&m), vec!["first", "next"]);
    m.dispatch("<escape>");
    // `o` and each typed grapheme are separate history entries.
    assert_eq!(m.undo_depth(), 5);
}

#[test]
fn join_lines_with_capital_j() {
    let mut m = normal("a\n   b");
    typed(&mut m, "J");
    assert_eq!(m.value(), "a b");
}

#[test]
fn dollar_and_caret_motions() {
    let mut m = normal("  indented line");
    typed(&mut m, "$");
    assert_eq!(m.cursor(), pos(0, 14));
    typed(&mut m, "^");
    assert_eq!(m.cursor(), pos(0, 2));
    typed(&mut m, "d$");
    assert_eq!(m.value(), "  ");
    assert_eq!(m.cursor(), pos(0, 1));
}

#[test]
fn redo_clears_on_new_edit() {
    let mut m = normal("abc");
    typed(&mut m, "xu");
    assert_eq!(m.redo_depth(), 1);
    typed(&mut m, "x");
    assert_eq!(m.redo_depth(), 0);
    let out = m.dispatch("<ctrl+r>");
    assert_eq!(out.status, ExecStatus::Skipped);
    assert_eq!(m.value(), "bc");
}

#[test]
fn redo_reapplies_and_keeps_mode() {
    let mut m = normal("hello world");
    typed(&mut m, "dwu");
    let out = m.dispatch("<C-r>");
    assert_eq!(out.content_changed.as_deref(), Some("world"));
    assert_eq!(m.mode(), Mode::Normal);
    assert_eq!(out.mode_changed, None);
}

#[test]
fn insert_mode_deletions() {
    let mut m = insert("foo bar baz");
    m.dispatch("<ctrl+w>");
    assert_eq!(m.value(), "foo bar ");
    m.dispatch("<ctrl+u>");
    assert_eq!(m.value(), "");
    feed(&mut m, &["a", "b", "<left>", "<delete>"]);
    assert_eq!(m.value(), "a");
    m.dispatch("<backspace>");
    assert_eq!(m.value(), "");
}
