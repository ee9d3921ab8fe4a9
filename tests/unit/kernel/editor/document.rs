use super::*;
use crate::kernel::editor::syntax::HighlightKind;
use crate::kernel::services::adapters::file::LocalFileProvider;
use tempfile::tempdir;

fn settings() -> EditorSettings {
    EditorSettings::default()
}

fn type_text(doc: &mut Document, text: &str, now: Instant) {
    for c in text.chars() {
        doc.insert_char(c, now);
    }
}

#[test]
fn window_title_marks_unsaved_changes() {
    let mut doc = Document::untitled(1, "untitled-1".into(), &settings());
    assert_eq!(doc.window_title(), "untitled-1");

    doc.insert_char('x', Instant::now());
    assert!(doc.is_changed());
    assert_eq!(doc.window_title(), "untitled-1*");
}

#[test]
fn newline_after_open_brace_indents_one_unit() {
    let mut doc = Document::untitled(1, "t".into(), &settings());
    doc.set_syntax_override(Some(LanguageId::Rust));
    let now = Instant::now();

    type_text(&mut doc, "foo {", now);
    doc.insert_newline(now);

    assert_eq!(doc.buffer().line(1).as_deref(), Some("    "));
    assert_eq!(doc.buffer().cursor(), (1, 4));
}

#[test]
fn typing_closing_brace_dedents_line() {
    let mut doc = Document::untitled(1, "t".into(), &settings());
    let now = Instant::now();

    type_text(&mut doc, "foo {\nbar\n}", now);

    assert_eq!(doc.buffer().text(), "foo {\n    bar\n}");
    assert_eq!(doc.buffer().cursor(), (2, 1));
}

#[test]
fn auto_indent_can_be_disabled() {
    let mut settings = settings();
    settings.auto_indent = false;
    let mut doc = Document::untitled(1, "t".into(), &settings);

    type_text(&mut doc, "foo {\nbar", Instant::now());
    assert_eq!(doc.buffer().text(), "foo {\nbar");
}

#[test]
fn highlighting_waits_for_debounce_delay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.rs");
    std::fs::write(&path, "fn main() {}\n").unwrap();
    let fs = LocalFileProvider::new();
    let mut doc = Document::open(1, &path, &fs, &settings()).unwrap();
    assert_eq!(doc.language(), Some(LanguageId::Rust));
    assert!(doc
        .highlight_line(0)
        .iter()
        .any(|s| s.kind == HighlightKind::Keyword));

    let t0 = Instant::now();
    doc.buffer_mut().set_cursor(1, 0);
    doc.insert_str("// c", t0);
    assert!(doc.has_pending_highlight());
    assert!(!doc.tick(t0 + Duration::from_millis(10)));
    assert!(doc.highlight_line(1).is_empty());

    assert!(doc.tick(t0 + Duration::from_millis(150)));
    assert!(!doc.has_pending_highlight());
    assert!(doc
        .highlight_line(1)
        .iter()
        .any(|s| s.kind == HighlightKind::Comment));
}

#[test]
fn further_edits_restart_the_delay() {
    let mut doc = Document::untitled(1, "t".into(), &settings());
    doc.set_syntax_override(Some(LanguageId::Rust));
    let t0 = Instant::now();

    doc.insert_char('a', t0);
    doc.insert_char('b', t0 + Duration::from_millis(80));
    assert_eq!(
        doc.highlight_deadline(),
        Some(t0 + Duration::from_millis(180))
    );
    assert!(!doc.tick(t0 + Duration::from_millis(120)));
    assert!(doc.tick(t0 + Duration::from_millis(200)));
}

#[test]
fn syntax_override_beats_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.txt");
    std::fs::write(&path, "# note\n").unwrap();
    let fs = LocalFileProvider::new();
    let mut doc = Document::open(1, &path, &fs, &settings()).unwrap();
    assert_eq!(doc.language(), None);
    assert!(doc.highlight_line(0).is_empty());

    doc.set_syntax_override(Some(LanguageId::Python));
    assert_eq!(doc.language(), Some(LanguageId::Python));
    assert!(doc
        .highlight_line(0)
        .iter()
        .any(|s| s.kind == HighlightKind::Comment));
}

#[test]
fn save_clears_changed_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    std::fs::write(&path, "").unwrap();
    let fs = LocalFileProvider::new();
    let mut doc = Document::open(1, &path, &fs, &settings()).unwrap();

    doc.insert_str("hello", Instant::now());
    assert!(doc.save(&fs).unwrap());

    assert!(!doc.is_changed());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn untitled_save_needs_a_path() {
    let dir = tempdir().unwrap();
    let fs = LocalFileProvider::new();
    let mut doc = Document::untitled(1, "untitled-1".into(), &settings());
    doc.insert_str("x", Instant::now());

    assert!(!doc.save(&fs).unwrap());
    assert!(doc.is_changed());

    let path = dir.path().join("named.py");
    doc.save_as(&path, &fs).unwrap();
    assert_eq!(doc.title(), "named.py");
    assert_eq!(doc.language(), Some(LanguageId::Python));
    assert!(!doc.is_changed());
}
