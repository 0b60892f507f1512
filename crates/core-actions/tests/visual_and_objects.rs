mod support;
use support::*;

use core_actions::ModeChange;
use core_state::Mode;
use pretty_assertions::assert_eq;

#[test]
fn select_inner_word_then_delete() {
    let mut m = normal("foo bar baz");
    typed(&mut m, "w");
    let out = typed(&mut m, "viw").unwrap();
    assert_eq!(
        out.mode_changed,
        Some(ModeChange {
            from: Mode::Normal,
            to: Mode::Visual
        })
    );
    assert_eq!(m.selected_text().as_deref(), Some("bar"));
    typed(&mut m, "d");
    assert_eq!(m.value(), "foo  baz");
    assert_eq!(m.cursor(), pos(0, 4));
    assert_eq!(m.mode(), Mode::Normal);
    assert_eq!(m.register().text, "bar");
}

#[test]
fn change_inside_empty_quotes_enters_insert_between_them() {
    let mut m = normal("say \"\" now");
    typed(&mut m, "w");
    assert_eq!(m.cursor(), pos(0, 4));
    typed(&mut m, "ci\"");
    assert_eq!(m.mode(), Mode::Insert);
    assert_eq!(m.cursor(), pos(0, 5));
    typed(&mut m, "x");
    assert_eq!(m.value(), "say \"x\" now");
}

#[test]
fn delete_inside_parens_from_closing_paren() {
    let mut m = normal("call(a, b)");
    typed(&mut m, "$di(");
    assert_eq!(m.value(), "call()");
    assert_eq!(m.cursor(), pos(0, 5));
    assert_eq!(m.register().text, "a, b");
}

#[test]
fn delete_around_quotes() {
    let mut m = normal("x = \"hi\";");
    typed(&mut m, "$hhda\"");
    assert_eq!(m.value(), "x = ;");
}

#[test]
fn missing_object_leaves_buffer_alone() {
    let mut m = normal("no brackets here");
    typed(&mut m, "di(");
    assert_eq!(m.value(), "no brackets here");
    assert!(!m.is_pending());
    assert_eq!(m.undo_depth(), 0);
}

#[test]
fn visual_line_delete_of_every_line_then_undo() {
    let mut m = normal("a\nb");
    typed(&mut m, "Vjd");
    assert_eq!(lines(&m), vec![""]);
    assert_eq!(m.mode(), Mode::Normal);
    assert!(m.register().linewise);
    let out = m.dispatch("u");
    assert_eq!(out.content_changed.as_deref(), Some("a\nb"));
    assert_eq!(m.mode(), Mode::Normal);
}

#[test]
fn v_then_motion_falls_back_to_visual() {
    let mut m = normal("foo bar");
    let out = typed(&mut m, "ve").unwrap();
    assert!(out.handled);
    assert_eq!(m.mode(), Mode::Visual);
    assert_eq!(m.visual_bounds(), Some((pos(0, 0), pos(0, 2))));
    let out = typed(&mut m, "y").unwrap();
    assert!(out.highlight_requested.is_some());
    assert_eq!(m.mode(), Mode::Normal);
    assert_eq!(m.cursor(), pos(0, 0));
    typed(&mut m, "$p");
    assert_eq!(m.value(), "foo barfoo");
}

#[test]
fn visual_swap_moves_to_other_end() {
    let mut m = normal("abcdef");
    typed(&mut m, "lvlllo");
    assert_eq!(m.cursor(), pos(0, 1));
    assert_eq!(m.visual_bounds(), Some((pos(0, 1), pos(0, 4))));
}

#[test]
fn visual_change_enters_insert() {
    let mut m = normal("hello world");
    typed(&mut m, "vec");
    assert_eq!(m.mode(), Mode::Insert);
    typed(&mut m, "bye");
    assert_eq!(m.value(), "bye world");
}

#[test]
fn visual_line_yank_is_linewise() {
    let mut m = normal("one\ntwo\nthree");
    let out = typed(&mut m, "jVjy").unwrap();
    let span = out.highlight_requested.unwrap();
    assert!(span.linewise);
    assert_eq!((span.start, span.end), (pos(1, 0), pos(2, 5)));
    assert_eq!(m.register().text, "two\nthree");
    assert_eq!(m.undo_depth(), 0);
}

#[test]
fn escape_leaves_visual_without_moving() {
    let mut m = normal("abc");
    typed(&mut m, "vl");
    let out = m.dispatch("<escape>");
    assert_eq!(
        out.mode_changed,
        Some(ModeChange {
            from: Mode::Visual,
            to: Mode::Normal
        })
    );
    assert_eq!(m.cursor(), pos(0, 1));
    assert_eq!(m.visual_bounds(), None);
}

#[test]
fn around_bracket_selection_in_visual() {
    let mut m = normal("f(x[1])");
    typed(&mut m, "$hhvab");
    assert_eq!(m.selected_text().as_deref(), Some("[1]"));
    typed(&mut m, "a(");
    assert_eq!(m.selected_text().as_deref(), Some("(x[1])"));
}
