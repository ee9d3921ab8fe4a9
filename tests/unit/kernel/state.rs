use super::*;
use crate::kernel::services::adapters::LocalFileProvider;

fn new_state() -> AppState {
    AppState::new(
        ProjectExplorer::new(Box::new(LocalFileProvider::new())),
        Settings::default(),
        RecentProjects::new(),
    )
}

#[test]
fn untitled_titles_count_up() {
    let mut state = new_state();
    assert_eq!(state.next_untitled_title(), "untitled-1");
    assert_eq!(state.next_untitled_title(), "untitled-2");
}

#[test]
fn document_ids_are_never_reused() {
    let mut state = new_state();
    let a = state.allocate_document_id();
    let b = state.allocate_document_id();
    assert_ne!(a, b);
    assert!(b > a);
}

#[test]
fn view_toggles_start_from_editor_settings() {
    let mut settings = Settings::default();
    settings.editor.show_line_numbers = false;
    settings.editor.hidden_chars = true;
    let state = AppState::new(
        ProjectExplorer::new(Box::new(LocalFileProvider::new())),
        settings,
        RecentProjects::new(),
    );

    assert!(!state.ui.show_line_numbers);
    assert!(state.ui.hidden_chars);
    assert!(state.active_document().is_none());
}

#[test]
fn any_open_dialog_counts_as_modal() {
    let mut ui = UiState::default();
    assert!(!ui.has_modal());

    ui.messages.push_back("hi".to_string());
    assert!(ui.has_modal());
    ui.messages.clear();

    ui.input_dialog
        .open("Open File", "src/".to_string(), InputDialogKind::OpenFile);
    assert!(ui.has_modal());
    assert_eq!(ui.input_dialog.cursor, 4);

    ui.input_dialog.reset();
    ui.save_prompt.doc = Some(1);
    assert!(ui.has_modal());
}

#[cfg(unix)]
#[test]
fn resolve_path_joins_working_dir_and_drops_dot() {
    let mut state = new_state();
    state.working_dir = PathBuf::from("/work");

    assert_eq!(
        state.resolve_path(Path::new("./a/./b.txt")).to_str(),
        Some("/work/a/b.txt")
    );
    assert_eq!(
        state.resolve_path(Path::new("/abs/c.txt")),
        PathBuf::from("/abs/c.txt")
    );
}
