use super::*;
use crate::kernel::explorer::{BuildRequest, ProjectExplorer};
use crate::kernel::services::adapters::file::LocalFileProvider;
use crate::kernel::services::ports::Settings;
use crate::models::RecentProjects;
use std::path::PathBuf;
use tempfile::tempdir;

fn new_store() -> Store {
    let explorer = ProjectExplorer::new(Box::new(LocalFileProvider::new()));
    Store::new(AppState::new(
        explorer,
        Settings::default(),
        RecentProjects::new(),
    ))
}

fn run(store: &mut Store, cmd: Command) -> DispatchResult {
    store.dispatch(Action::RunCommand(cmd))
}

fn type_into_dialog(store: &mut Store, text: &str) {
    for ch in text.chars() {
        store.dispatch(Action::InputDialogAppend(ch));
    }
}

fn select_path(store: &mut Store, path: &Path) {
    // 逐层展开祖先直到目标可见
    loop {
        let tree = store.state().explorer.tree();
        let id = tree.find_by_path(path).unwrap();
        let mut chain = vec![id];
        while let Some(parent) = chain.last().and_then(|&n| tree.parent(n)) {
            chain.push(parent);
        }
        chain.reverse();
        let target = chain
            .iter()
            .copied()
            .find(|&n| n == id || !tree.is_expanded(n))
            .unwrap();
        let row = tree
            .flatten_for_view()
            .iter()
            .position(|r| r.id == target)
            .unwrap();
        store.dispatch(Action::ExplorerSelectRow { row });
        if target == id {
            return;
        }
        run(store, Command::ExplorerActivate);
    }
}

/// `<dir>/demo/demo.qproj` + `src/main.rs`
fn demo_project(dir: &Path) -> PathBuf {
    let folder = dir.join("demo");
    let project = Project::create(&folder, "demo", Some("make all".to_string())).unwrap();
    std::fs::create_dir_all(folder.join("src")).unwrap();
    std::fs::write(folder.join("src/main.rs"), "fn main() {}\n").unwrap();
    project.project_file
}

#[test]
fn closing_last_document_requests_quit() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    assert_eq!(store.state().documents.len(), 1);

    run(&mut store, Command::CloseTab);
    assert!(store.state().documents.is_empty());
    assert!(store.state().ui.should_quit);
}

#[test]
fn cancel_at_save_prompt_keeps_document() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    run(&mut store, Command::InsertChar('x'));

    run(&mut store, Command::CloseTab);
    assert!(store.state().ui.save_prompt.visible());
    assert_eq!(store.state().ui.save_prompt.message, "Save changes to untitled-1?");

    store.dispatch(Action::SavePromptCancel);
    assert!(!store.state().ui.save_prompt.visible());
    assert_eq!(store.state().documents.len(), 1);
    assert!(!store.state().ui.should_quit);
}

#[test]
fn discard_closes_without_saving() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    run(&mut store, Command::InsertChar('x'));
    run(&mut store, Command::CloseTab);

    store.dispatch(Action::SavePromptDiscard);
    assert!(store.state().documents.is_empty());
    assert!(store.state().ui.should_quit);
}

#[test]
fn saving_untitled_at_close_asks_for_path_first() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    run(&mut store, Command::InsertChar('x'));
    run(&mut store, Command::CloseTab);

    store.dispatch(Action::SavePromptSave);
    let dialog = &store.state().ui.input_dialog;
    assert!(dialog.visible);
    assert!(matches!(
        dialog.kind,
        Some(InputDialogKind::SaveAs {
            then_close: true,
            ..
        })
    ));

    type_into_dialog(&mut store, &target.display().to_string());
    store.dispatch(Action::InputDialogAccept);

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "x");
    assert!(store.state().documents.is_empty());
    assert!(store.state().ui.should_quit);
}

#[test]
fn close_all_prompts_each_and_cancel_stops_the_batch() {
    let mut store = new_store();
    for dirty in [true, false, true] {
        run(&mut store, Command::NewFile);
        if dirty {
            run(&mut store, Command::InsertChar('x'));
        }
    }

    run(&mut store, Command::CloseAll);
    assert_eq!(store.state().ui.save_prompt.message, "Save changes to untitled-1?");
    store.dispatch(Action::SavePromptCancel);
    assert_eq!(store.state().documents.len(), 3);
    assert!(store.state().ui.close_queue.is_empty());

    run(&mut store, Command::CloseAll);
    store.dispatch(Action::SavePromptDiscard);
    // untitled-2 没改动，直接关掉
    assert_eq!(store.state().ui.save_prompt.message, "Save changes to untitled-3?");
    store.dispatch(Action::SavePromptCancel);

    let titles: Vec<&str> = store.state().documents.iter().map(|d| d.title()).collect();
    assert_eq!(titles, vec!["untitled-3"]);
    assert_eq!(store.state().active, Some(0));
    assert!(!store.state().ui.should_quit);
}

#[test]
fn close_others_keeps_active_document() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    run(&mut store, Command::NewFile);
    run(&mut store, Command::NewFile);
    store.dispatch(Action::SetActiveDocument { index: 1 });

    run(&mut store, Command::CloseOthers);
    let titles: Vec<&str> = store.state().documents.iter().map(|d| d.title()).collect();
    assert_eq!(titles, vec!["untitled-2"]);
    assert_eq!(store.state().active, Some(0));
}

#[test]
fn pasting_existing_paths_opens_them() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.rs");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "a").unwrap();
    std::fs::write(&b, "b").unwrap();

    let mut store = new_store();
    run(&mut store, Command::NewFile);
    store.dispatch(Action::Paste(format!("{}\n{}\n", a.display(), b.display())));

    let titles: Vec<&str> = store.state().documents.iter().map(|d| d.title()).collect();
    assert_eq!(titles, vec!["untitled-1", "a.rs", "b.txt"]);
    assert_eq!(store.state().active, Some(2));
    assert_eq!(store.state().documents[0].buffer().text(), "");
}

#[test]
fn pasting_plain_text_inserts_it() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);
    store.dispatch(Action::Paste("hello\r\nworld".to_string()));

    let doc = store.state().active_document().unwrap();
    assert_eq!(doc.buffer().text(), "hello\nworld");
    assert!(doc.is_changed());
}

#[test]
fn opening_same_file_twice_switches_to_it() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    std::fs::write(&a, "a").unwrap();

    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![a.clone()]));
    run(&mut store, Command::NewFile);
    store.dispatch(Action::OpenPaths(vec![a]));

    assert_eq!(store.state().documents.len(), 2);
    assert_eq!(store.state().active, Some(0));
}

#[test]
fn opening_missing_file_shows_message() {
    let dir = tempdir().unwrap();
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![dir.path().join("nope.txt")]));

    assert!(store.state().documents.is_empty());
    assert_eq!(store.state().ui.messages.len(), 1);
    store.dispatch(Action::DismissMessage);
    assert!(store.state().ui.messages.is_empty());
}

#[test]
fn opening_project_records_recent_and_remove_prunes_it() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = new_store();

    store.dispatch(Action::OpenPaths(vec![descriptor.clone()]));
    assert!(store.state().recent.contains(&descriptor));
    assert_eq!(store.state().explorer.tree().roots().len(), 1);

    // 关闭项目同样把它移出最近列表
    run(&mut store, Command::CloseProject);
    assert!(store.state().explorer.tree().is_empty());
    assert!(!store.state().recent.contains(&descriptor));
    assert!(descriptor.exists());

    store.dispatch(Action::OpenPaths(vec![descriptor.clone()]));
    assert!(store.state().recent.contains(&descriptor));

    run(&mut store, Command::RemoveProject);
    assert!(store.state().ui.confirm_dialog.visible);
    store.dispatch(Action::ConfirmDialogAccept);

    assert!(store.state().explorer.tree().is_empty());
    assert!(!store.state().recent.contains(&descriptor));
    assert!(descriptor.exists());
}

#[test]
fn delete_project_needs_confirmation() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor.clone()]));

    run(&mut store, Command::DeleteProject);
    store.dispatch(Action::ConfirmDialogCancel);
    assert!(dir.path().join("demo").exists());

    run(&mut store, Command::DeleteProject);
    store.dispatch(Action::ConfirmDialogAccept);
    assert!(!dir.path().join("demo").exists());
    assert!(store.state().recent.is_empty());
}

#[test]
fn deleting_vanished_node_reports_error() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let main_rs = dir.path().join("demo/src/main.rs");
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor]));

    select_path(&mut store, &main_rs);
    std::fs::remove_file(&main_rs).unwrap();

    run(&mut store, Command::ExplorerDelete);
    assert!(store.state().ui.confirm_dialog.visible);
    store.dispatch(Action::ConfirmDialogAccept);

    assert_eq!(store.state().ui.messages.len(), 1);
    assert!(store.state().explorer.tree().find_by_path(&main_rs).is_some());
}

#[test]
fn renaming_folder_refreshes_child_paths() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor]));

    select_path(&mut store, &dir.path().join("demo/src"));
    run(&mut store, Command::ExplorerRename);
    assert_eq!(store.state().ui.input_dialog.value, "src");
    for _ in 0..3 {
        store.dispatch(Action::InputDialogBackspace);
    }
    type_into_dialog(&mut store, "lib");
    store.dispatch(Action::InputDialogAccept);

    let tree = store.state().explorer.tree();
    assert!(tree
        .find_by_path(&dir.path().join("demo/lib/main.rs"))
        .is_some());
    assert!(tree.find_by_path(&dir.path().join("demo/src")).is_none());
}

#[test]
fn renaming_open_file_retitles_document() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let main_rs = dir.path().join("demo/src/main.rs");
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor, main_rs.clone()]));

    select_path(&mut store, &main_rs);
    run(&mut store, Command::ExplorerRename);
    for _ in 0.."main.rs".len() {
        store.dispatch(Action::InputDialogBackspace);
    }
    type_into_dialog(&mut store, "app.py");
    store.dispatch(Action::InputDialogAccept);

    let doc = &store.state().documents[0];
    assert_eq!(doc.title(), "app.py");
    assert_eq!(doc.language(), Some(crate::kernel::LanguageId::Python));
}

#[test]
fn new_file_dialog_validates_name() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor]));

    run(&mut store, Command::ExplorerNewFile);
    store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        store.state().ui.input_dialog.error.as_deref(),
        Some("Name required")
    );

    type_into_dialog(&mut store, "a/b");
    store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        store.state().ui.input_dialog.error.as_deref(),
        Some("Invalid name")
    );

    for _ in 0..3 {
        store.dispatch(Action::InputDialogBackspace);
    }
    type_into_dialog(&mut store, "notes.md");
    store.dispatch(Action::InputDialogAccept);
    assert!(!store.state().ui.input_dialog.visible);
    assert!(dir.path().join("demo/notes.md").is_file());
}

#[test]
fn build_emits_effect_for_owning_project() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = new_store();
    store.dispatch(Action::OpenPaths(vec![descriptor]));
    select_path(&mut store, &dir.path().join("demo/src/main.rs"));

    let result = run(&mut store, Command::Build);
    assert_eq!(
        result.effects,
        vec![Effect::RunBuild(BuildRequest {
            command: "make all".to_string(),
            cwd: dir.path().join("demo"),
        })]
    );
}

#[test]
fn new_project_wizard_creates_and_opens_project() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("fresh");
    let mut store = new_store();

    run(&mut store, Command::NewProject);
    type_into_dialog(&mut store, "fresh");
    store.dispatch(Action::InputDialogAccept);
    type_into_dialog(&mut store, &folder.display().to_string());
    store.dispatch(Action::InputDialogAccept);
    store.dispatch(Action::InputDialogAccept);

    let descriptor = folder.join("fresh.qproj");
    assert!(descriptor.is_file());
    assert!(store.state().recent.contains(&descriptor));
    let project = &store.state().explorer.projects()[0];
    assert_eq!(project.name, "fresh");
    assert_eq!(project.build_command, None);
}

#[test]
fn set_syntax_dialog_overrides_language() {
    let mut store = new_store();
    run(&mut store, Command::NewFile);

    run(&mut store, Command::SetSyntax);
    type_into_dialog(&mut store, "cobol");
    store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        store.state().ui.input_dialog.error.as_deref(),
        Some("Unknown language")
    );

    store.dispatch(Action::InputDialogCancel);
    run(&mut store, Command::SetSyntax);
    type_into_dialog(&mut store, "rust");
    store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        store.state().active_document().unwrap().language(),
        Some(crate::kernel::LanguageId::Rust)
    );
}

#[test]
fn run_script_dialog_emits_effect() {
    let mut store = new_store();
    run(&mut store, Command::RunScript);
    type_into_dialog(&mut store, "/tmp/x.qs");
    let result = store.dispatch(Action::InputDialogAccept);
    assert_eq!(
        result.effects,
        vec![Effect::RunScript(PathBuf::from("/tmp/x.qs"))]
    );
}

#[test]
fn script_api_drives_the_store() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("s.txt");
    std::fs::write(&file, "").unwrap();
    let mut store = new_store();

    assert!(store.insert_text("x").is_err());
    store.open_document(&file).unwrap();
    store.insert_text("abc").unwrap();
    store.show_message("done");

    assert_eq!(store.state().active_document().unwrap().buffer().text(), "abc");
    assert_eq!(store.state().ui.messages.front().map(String::as_str), Some("done"));
    assert!(store.open_project(&dir.path().join("none.qproj")).is_err());
}

fn store_in(dir: &Path) -> Store {
    let mut store = new_store();
    store.state.working_dir = dir.to_path_buf();
    store
}

#[test]
fn wizard_with_relative_folder_survives_refresh() {
    let dir = tempdir().unwrap();
    let mut store = store_in(dir.path());

    run(&mut store, Command::NewProject);
    type_into_dialog(&mut store, "rel");
    store.dispatch(Action::InputDialogAccept);
    type_into_dialog(&mut store, "rel");
    store.dispatch(Action::InputDialogAccept);
    store.dispatch(Action::InputDialogAccept);

    let folder = dir.path().join("rel");
    assert!(folder.join("rel.qproj").is_file());
    assert_eq!(store.state().explorer.projects()[0].folder, folder);

    run(&mut store, Command::RefreshProjects);

    assert!(store.state().ui.messages.is_empty());
    assert_eq!(store.state().explorer.projects()[0].folder, folder);
    assert_eq!(store.state().explorer.tree().roots().len(), 1);
}

#[test]
fn relative_dialog_paths_resolve_against_working_dir() {
    let dir = tempdir().unwrap();
    let descriptor = demo_project(dir.path());
    let mut store = store_in(dir.path());

    run(&mut store, Command::OpenProject);
    type_into_dialog(&mut store, "demo/demo.qproj");
    store.dispatch(Action::InputDialogAccept);

    assert!(store.state().ui.messages.is_empty());
    let recent: Vec<&Path> = store.state().recent.iter().collect();
    assert_eq!(recent, vec![descriptor.as_path()]);
    assert!(recent.iter().all(|p| p.is_absolute()));

    run(&mut store, Command::OpenFile);
    type_into_dialog(&mut store, "./demo/src/main.rs");
    store.dispatch(Action::InputDialogAccept);
    let main_rs = dir.path().join("demo/src/main.rs");
    assert_eq!(
        store.state().active_document().unwrap().path(),
        Some(main_rs.as_path())
    );

    // 同一文件的绝对写法不会再开一个标签
    store.dispatch(Action::OpenPaths(vec![main_rs.clone()]));
    assert_eq!(store.state().documents.len(), 1);
}
