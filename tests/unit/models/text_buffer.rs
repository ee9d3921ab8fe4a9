use super::*;

#[test]
fn insert_reports_touched_lines() {
    let mut buffer = TextBuffer::from_text("ab");
    buffer.set_cursor(0, 1);

    let range = buffer.insert_str("x\ny\nz");
    assert_eq!(range, LineRange { start: 0, end: 2 });
    assert_eq!(buffer.text(), "ax\ny\nzb");
    assert_eq!(buffer.cursor(), (2, 1));
}

#[test]
fn set_cursor_clamps() {
    let mut buffer = TextBuffer::from_text("hello\nhi");
    buffer.set_cursor(9, 9);
    assert_eq!(buffer.cursor(), (1, 2));
}

#[test]
fn backspace_joins_lines() {
    let mut buffer = TextBuffer::from_text("foo\nbar");
    buffer.set_cursor(1, 0);

    assert_eq!(buffer.delete_backward(), Some(LineRange::single(0)));
    assert_eq!(buffer.text(), "foobar");
    assert_eq!(buffer.cursor(), (0, 3));

    buffer.set_cursor(0, 0);
    assert_eq!(buffer.delete_backward(), None);
}

#[test]
fn delete_forward_at_line_end_joins_next_line() {
    let mut buffer = TextBuffer::from_text("foo\r\nbar");
    buffer.set_cursor(0, 3);

    assert!(buffer.delete_forward().is_some());
    assert_eq!(buffer.text(), "foobar");
}

#[test]
fn line_strips_newline() {
    let buffer = TextBuffer::from_text("one\ntwo\n");
    assert_eq!(buffer.line(0).as_deref(), Some("one"));
    assert_eq!(buffer.line(2).as_deref(), Some(""));
    assert_eq!(buffer.line(3), None);
    assert_eq!(buffer.line_grapheme_len(1), 3);
}

#[test]
fn set_line_indent_shifts_cursor() {
    let mut buffer = TextBuffer::from_text("\t}\n");
    buffer.set_cursor(0, 2);

    assert!(buffer.set_line_indent(0, 0));
    assert_eq!(buffer.line(0).as_deref(), Some("}"));
    assert_eq!(buffer.cursor(), (0, 1));

    assert!(!buffer.set_line_indent(0, 0));
    assert!(buffer.set_line_indent(0, 4));
    assert_eq!(buffer.line(0).as_deref(), Some("    }"));
    assert_eq!(buffer.leading_indent(0, 4), 4);
}

#[test]
fn cursor_moves_wrap_between_lines() {
    let mut buffer = TextBuffer::from_text("ab\ncd");
    buffer.set_cursor(1, 0);
    assert!(buffer.move_left());
    assert_eq!(buffer.cursor(), (0, 2));
    assert!(buffer.move_right());
    assert_eq!(buffer.cursor(), (1, 0));
    assert!(!buffer.move_down());
    assert!(buffer.move_line_end());
    assert_eq!(buffer.cursor(), (1, 2));
}
