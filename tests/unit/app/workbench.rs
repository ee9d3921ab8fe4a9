use super::*;
use crate::core::Command;
use crate::kernel::explorer::ProjectExplorer;
use crate::kernel::services::adapters::LocalFileProvider;
use crate::kernel::services::ports::Settings;
use crate::kernel::{AppState, BuildRequest, FocusTarget};
use crate::models::RecentProjects;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::mpsc;
use tempfile::tempdir;

fn new_workbench() -> Workbench {
    let explorer = ProjectExplorer::new(Box::new(LocalFileProvider::new()));
    let store = Store::new(AppState::new(
        explorer,
        Settings::default(),
        RecentProjects::new(),
    ));
    Workbench::new(
        store,
        KeybindingService::with_defaults(),
        UiTheme::default(),
        None,
    )
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code, modifiers))
}

fn type_text(workbench: &mut Workbench, text: &str) {
    for ch in text.chars() {
        workbench.handle_input(&key(KeyCode::Char(ch), KeyModifiers::NONE));
    }
}

fn render_to_string(workbench: &mut Workbench, w: u16, h: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            workbench.render(frame, area);
        })
        .unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for (i, cell) in buffer.content().iter().enumerate() {
        if i > 0 && i % w as usize == 0 {
            out.push('\n');
        }
        out.push_str(cell.symbol());
    }
    out
}

fn active_text(workbench: &Workbench) -> String {
    workbench
        .store()
        .state()
        .active_document()
        .unwrap()
        .buffer()
        .text()
}

#[test]
fn typed_characters_go_into_the_active_document() {
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));

    type_text(&mut workbench, "Hi");
    workbench.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));
    type_text(&mut workbench, "x");

    assert_eq!(active_text(&workbench), "Hi\nx");
    assert!(workbench.store().state().active_document().unwrap().is_changed());
}

#[test]
fn ctrl_b_toggles_sidebar() {
    let mut workbench = new_workbench();
    assert!(workbench.store().state().ui.sidebar_visible);

    assert!(workbench.handle_input(&key(KeyCode::Char('b'), KeyModifiers::CONTROL)));
    assert!(!workbench.store().state().ui.sidebar_visible);
}

#[test]
fn message_dialog_swallows_keys_until_dismissed() {
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    workbench.dispatch(KernelAction::ShowMessage("boom".to_string()));

    type_text(&mut workbench, "x");
    assert_eq!(active_text(&workbench), "");

    let screen = render_to_string(&mut workbench, 80, 20);
    assert!(screen.contains("boom"));

    workbench.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));
    assert!(workbench.store().state().ui.messages.is_empty());
    type_text(&mut workbench, "x");
    assert_eq!(active_text(&workbench), "x");
}

#[test]
fn open_file_dialog_reads_keys_and_opens_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();
    let mut workbench = new_workbench();

    workbench.handle_input(&key(KeyCode::Char('o'), KeyModifiers::CONTROL));
    assert!(workbench.store().state().ui.input_dialog.visible);

    type_text(&mut workbench, &path.display().to_string());
    workbench.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));

    let state = workbench.store().state();
    assert!(!state.ui.input_dialog.visible);
    assert_eq!(state.active_document().unwrap().title(), "notes.txt");
    assert_eq!(active_text(&workbench), "hello");
}

#[test]
fn pasting_a_file_path_opens_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dropped.rs");
    std::fs::write(&path, "fn main() {}\n").unwrap();
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));

    workbench.handle_input(&InputEvent::Paste(path.display().to_string()));

    let state = workbench.store().state();
    assert_eq!(state.documents.len(), 2);
    assert_eq!(state.active_document().unwrap().title(), "dropped.rs");
}

#[test]
fn explorer_focus_routes_letters_to_tree_commands() {
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    workbench.handle_input(&key(KeyCode::Char('e'), KeyModifiers::CONTROL));
    assert_eq!(workbench.store().state().ui.focus, FocusTarget::Explorer);

    // 没有选中项目时新建文件只给出提示，不会插入文本
    type_text(&mut workbench, "a");
    assert_eq!(active_text(&workbench), "");
    assert_eq!(workbench.store().state().ui.messages.len(), 1);
}

#[test]
fn render_shows_dirty_tab_and_hidden_chars() {
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    workbench.dispatch(KernelAction::RunCommand(Command::ToggleHiddenChars));
    workbench.dispatch(KernelAction::Paste("a b\nc".to_string()));

    let screen = render_to_string(&mut workbench, 80, 12);

    assert!(screen.contains("untitled-1*"));
    assert!(screen.contains("a·b¶"));
    assert!(workbench.cursor_position().is_some());
}

#[test]
fn clicking_a_tab_activates_it() {
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    assert_eq!(workbench.store().state().active, Some(1));
    render_to_string(&mut workbench, 100, 12);

    let tabs = workbench.layout.tabs.unwrap();
    let (start, _) = workbench.layout.tab_spans[0];
    workbench.handle_input(&InputEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: tabs.x + start + 1,
        row: tabs.y,
        modifiers: KeyModifiers::NONE,
    }));

    assert_eq!(workbench.store().state().active, Some(0));
}

#[test]
fn tick_pulls_latest_log_line() {
    let (tx, rx) = mpsc::channel();
    let mut workbench = new_workbench();
    workbench.log_rx = Some(rx);

    tx.send("first".to_string()).unwrap();
    tx.send("second".to_string()).unwrap();
    assert!(workbench.tick(Instant::now()));

    assert_eq!(workbench.last_log(), Some("second"));
}

#[test]
fn poll_timeout_tracks_pending_highlight() {
    let mut workbench = new_workbench();
    let now = Instant::now();
    assert_eq!(workbench.poll_timeout(now), IDLE_POLL);

    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));
    type_text(&mut workbench, "x");

    let delay = Duration::from_millis(Settings::default().editor.highlight_delay_ms);
    assert!(workbench.poll_timeout(Instant::now()) <= delay);
}

#[test]
fn run_script_effect_executes_against_store() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("setup.qs");
    std::fs::write(&script, "fn main {\n    insert \"from script\"\n}\n").unwrap();
    let mut workbench = new_workbench();
    workbench.dispatch(KernelAction::RunCommand(Command::NewFile));

    workbench.dispatch(KernelAction::RunCommand(Command::RunScript));
    workbench.handle_input(&InputEvent::Paste(script.display().to_string()));
    workbench.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));

    assert_eq!(active_text(&workbench), "from script");
    assert!(dir.path().join("setup.qs.cache").exists());
}

#[test]
fn failing_script_shows_message_and_keeps_running() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("broken.qs");
    std::fs::write(&script, "fn helper {\n}\n").unwrap();
    let mut workbench = new_workbench();

    workbench.dispatch(KernelAction::RunCommand(Command::RunScript));
    workbench.handle_input(&InputEvent::Paste(script.display().to_string()));
    workbench.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));

    let state = workbench.store().state();
    assert_eq!(state.ui.messages.len(), 1);
    assert!(state.ui.messages[0].contains("main"));
    assert!(!workbench.should_quit());
}

#[cfg(unix)]
#[test]
fn build_child_is_reaped_with_exit_status() {
    let dir = tempdir().unwrap();
    let ok = bridge::spawn_build(&BuildRequest {
        command: "touch built".to_string(),
        cwd: dir.path().to_path_buf(),
    })
    .unwrap();
    assert!(ok.join().unwrap().unwrap().success());
    assert!(dir.path().join("built").exists());

    let failed = bridge::spawn_build(&BuildRequest {
        command: "exit 3".to_string(),
        cwd: dir.path().to_path_buf(),
    })
    .unwrap();
    assert_eq!(failed.join().unwrap().unwrap().code(), Some(3));
}
