use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::core::Command;
use crate::kernel::editor::{Document, DocumentId};
use crate::kernel::explorer::ExplorerError;
use crate::kernel::script::ScriptApi;
use crate::kernel::services::ports::FileError;
use crate::models::Project;

use super::{Action, AppState, Effect, FocusTarget, InputDialogKind, PendingAction};

mod documents;
mod explorer;
mod input_dialog;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(cmd) => self.dispatch_command(cmd),
            Action::Paste(text) => self.paste(&text),
            Action::OpenPaths(paths) => {
                for path in paths {
                    let result = if Project::is_project_file(&path) {
                        self.open_project_path(&path).map_err(|e| e.to_string())
                    } else {
                        self.open_document_path(&path)
                            .map(|_| ())
                            .map_err(|e| e.to_string())
                    };
                    if let Err(e) = result {
                        self.report(e);
                    }
                }
                DispatchResult::changed(true)
            }
            Action::Tick { now } => {
                let mut changed = false;
                for doc in &mut self.state.documents {
                    changed |= doc.tick(now);
                }
                DispatchResult::changed(changed)
            }
            Action::ShowMessage(msg) => {
                self.state.ui.messages.push_back(msg);
                DispatchResult::changed(true)
            }
            Action::DismissMessage => {
                DispatchResult::changed(self.state.ui.messages.pop_front().is_some())
            }
            Action::SetActiveDocument { index } => {
                if index >= self.state.documents.len() || self.state.active == Some(index) {
                    return DispatchResult::changed(false);
                }
                self.state.active = Some(index);
                self.state.ui.focus = FocusTarget::Editor;
                DispatchResult::changed(true)
            }
            Action::ExplorerSelectRow { row } => {
                let rows = self.state.explorer.tree().flatten_for_view();
                let Some(target) = rows.get(row).map(|r| r.id) else {
                    return DispatchResult::changed(false);
                };
                let prev = self.state.explorer.tree().selected();
                self.state.explorer.tree_mut().set_selected(Some(target));
                self.state.ui.focus = FocusTarget::Explorer;
                DispatchResult::changed(prev != Some(target))
            }
            Action::InputDialogAppend(_)
            | Action::InputDialogBackspace
            | Action::InputDialogCursorLeft
            | Action::InputDialogCursorRight
            | Action::InputDialogAccept
            | Action::InputDialogCancel => self.reduce_input_dialog_action(action),
            Action::ConfirmDialogAccept => {
                let dialog = &mut self.state.ui.confirm_dialog;
                if !dialog.visible {
                    return DispatchResult::changed(false);
                }
                let pending = dialog.on_confirm.take();
                dialog.visible = false;
                dialog.message.clear();
                if let Some(pending) = pending {
                    self.apply_pending(pending);
                }
                DispatchResult::changed(true)
            }
            Action::ConfirmDialogCancel => {
                let dialog = &mut self.state.ui.confirm_dialog;
                if !dialog.visible {
                    return DispatchResult::changed(false);
                }
                *dialog = Default::default();
                DispatchResult::changed(true)
            }
            Action::SavePromptSave | Action::SavePromptDiscard | Action::SavePromptCancel => {
                self.reduce_save_prompt_action(action)
            }
        }
    }

    fn dispatch_command(&mut self, command: Command) -> DispatchResult {
        if command.is_edit_command() || command.is_cursor_command() {
            return self.edit_active(command);
        }
        if command.is_explorer_command() {
            return self.explorer_command(command);
        }

        match command {
            Command::NewFile => {
                self.new_untitled_document();
                DispatchResult::changed(true)
            }
            Command::OpenFile => {
                let value = self
                    .state
                    .active_document()
                    .and_then(Document::path)
                    .and_then(Path::parent)
                    .map(|dir| format!("{}/", dir.display()))
                    .unwrap_or_default();
                self.state
                    .ui
                    .input_dialog
                    .open("Open File", value, InputDialogKind::OpenFile);
                DispatchResult::changed(true)
            }
            Command::Save => {
                let Some(id) = self.state.active_document().map(Document::id) else {
                    return DispatchResult::changed(false);
                };
                self.save_document(id);
                DispatchResult::changed(true)
            }
            Command::SaveAs => {
                let Some(id) = self.state.active_document().map(Document::id) else {
                    return DispatchResult::changed(false);
                };
                self.prompt_save_as(id, false);
                DispatchResult::changed(true)
            }
            Command::CloseTab => {
                let Some(id) = self.state.active_document().map(Document::id) else {
                    return DispatchResult::changed(false);
                };
                self.request_close(vec![id]);
                DispatchResult::changed(true)
            }
            Command::CloseOthers => {
                let Some(active) = self.state.active_document().map(Document::id) else {
                    return DispatchResult::changed(false);
                };
                let others = self
                    .state
                    .documents
                    .iter()
                    .map(Document::id)
                    .filter(|&id| id != active)
                    .collect();
                self.request_close(others);
                DispatchResult::changed(true)
            }
            Command::CloseAll | Command::Quit => {
                if self.state.documents.is_empty() {
                    self.state.ui.should_quit = true;
                    return DispatchResult::changed(true);
                }
                let all = self.state.documents.iter().map(Document::id).collect();
                self.request_close(all);
                DispatchResult::changed(true)
            }
            Command::NextTab | Command::PrevTab => {
                let len = self.state.documents.len();
                let Some(active) = self.state.active.filter(|_| len > 1) else {
                    return DispatchResult::changed(false);
                };
                let next = if command == Command::NextTab {
                    (active + 1) % len
                } else {
                    (active + len - 1) % len
                };
                self.state.active = Some(next);
                DispatchResult::changed(true)
            }
            Command::SetSyntax => {
                let Some(doc) = self.state.active_document() else {
                    return DispatchResult::changed(false);
                };
                let id = doc.id();
                let value = doc
                    .syntax_override()
                    .map(|lang| lang.language_id().to_string())
                    .unwrap_or_default();
                self.state.ui.input_dialog.open(
                    "Syntax (empty = by extension)",
                    value,
                    InputDialogKind::SetSyntax { doc: id },
                );
                DispatchResult::changed(true)
            }
            Command::ToggleHiddenChars => {
                self.state.ui.hidden_chars = !self.state.ui.hidden_chars;
                DispatchResult::changed(true)
            }
            Command::ToggleLineNumbers => {
                self.state.ui.show_line_numbers = !self.state.ui.show_line_numbers;
                DispatchResult::changed(true)
            }
            Command::NewProject => {
                self.state.ui.input_dialog.open(
                    "New Project: name",
                    String::new(),
                    InputDialogKind::NewProjectName,
                );
                DispatchResult::changed(true)
            }
            Command::OpenProject => {
                self.state.ui.input_dialog.open(
                    "Open Project (.qproj)",
                    String::new(),
                    InputDialogKind::OpenProject,
                );
                DispatchResult::changed(true)
            }
            Command::RefreshProjects => {
                if let Err(e) = self.state.explorer.refresh_projects() {
                    self.report(e);
                }
                DispatchResult::changed(true)
            }
            Command::CloseProject => {
                let Some(node) = self.state.selected_node() else {
                    return DispatchResult::changed(false);
                };
                match self.state.explorer.close_project(node) {
                    Ok(descriptor) => {
                        self.state.recent.remove(&descriptor);
                    }
                    Err(e) => self.report(e),
                }
                DispatchResult::changed(true)
            }
            Command::RemoveProject | Command::DeleteProject => {
                let Some(node) = self.state.selected_node() else {
                    return DispatchResult::changed(false);
                };
                let Some(project) = self.state.explorer.tree().project_of(node) else {
                    return DispatchResult::changed(false);
                };
                let (message, pending) = if command == Command::RemoveProject {
                    (
                        format!("Remove project '{}' from the list?", project.name),
                        PendingAction::RemoveProject { node },
                    )
                } else {
                    (
                        format!(
                            "Delete project '{}' and everything in {}?",
                            project.name,
                            project.folder.display()
                        ),
                        PendingAction::DeleteProject { node },
                    )
                };
                self.confirm(message, pending);
                DispatchResult::changed(true)
            }
            Command::Build => {
                let Some(node) = self.state.selected_node() else {
                    self.report("Select a project to build");
                    return DispatchResult::changed(true);
                };
                match self.state.explorer.build_command(node) {
                    Ok(Some(request)) => {
                        tracing::info!(command = %request.command, cwd = %request.cwd.display(), "build requested");
                        DispatchResult {
                            effects: vec![Effect::RunBuild(request)],
                            state_changed: false,
                        }
                    }
                    Ok(None) => {
                        self.report("This project has no build command");
                        DispatchResult::changed(true)
                    }
                    Err(e) => {
                        self.report(e);
                        DispatchResult::changed(true)
                    }
                }
            }
            Command::RunScript => {
                self.state
                    .ui
                    .input_dialog
                    .open("Run Script", String::new(), InputDialogKind::RunScript);
                DispatchResult::changed(true)
            }
            Command::ToggleSidebar => {
                self.state.ui.sidebar_visible = !self.state.ui.sidebar_visible;
                if !self.state.ui.sidebar_visible {
                    self.state.ui.focus = FocusTarget::Editor;
                }
                DispatchResult::changed(true)
            }
            Command::FocusExplorer => self.set_focus(FocusTarget::Explorer),
            Command::FocusEditor => self.set_focus(FocusTarget::Editor),
            Command::FocusNext => {
                let next = match self.state.ui.focus {
                    FocusTarget::Explorer => FocusTarget::Editor,
                    FocusTarget::Editor => FocusTarget::Explorer,
                };
                self.set_focus(next)
            }
            _ => DispatchResult::changed(false),
        }
    }

    fn set_focus(&mut self, target: FocusTarget) -> DispatchResult {
        if target == FocusTarget::Explorer {
            self.state.ui.sidebar_visible = true;
        }
        let prev = self.state.ui.focus;
        self.state.ui.focus = target;
        DispatchResult::changed(prev != target)
    }

    fn edit_active(&mut self, command: Command) -> DispatchResult {
        let now = Instant::now();
        let Some(doc) = self.state.active_document_mut() else {
            return DispatchResult::changed(false);
        };
        let changed = match command {
            Command::CursorLeft => doc.buffer_mut().move_left(),
            Command::CursorRight => doc.buffer_mut().move_right(),
            Command::CursorUp => doc.buffer_mut().move_up(),
            Command::CursorDown => doc.buffer_mut().move_down(),
            Command::CursorLineStart => doc.buffer_mut().move_line_start(),
            Command::CursorLineEnd => doc.buffer_mut().move_line_end(),
            Command::InsertChar(c) => {
                doc.insert_char(c, now);
                true
            }
            Command::InsertNewline => {
                doc.insert_newline(now);
                true
            }
            Command::InsertTab => {
                doc.insert_tab(now);
                true
            }
            Command::DeleteBackward => doc.delete_backward(now),
            Command::DeleteForward => doc.delete_forward(now),
            _ => false,
        };
        DispatchResult::changed(changed)
    }

    /// 粘贴内容每一行都是已存在的文件时按拖入文件处理
    fn paste(&mut self, text: &str) -> DispatchResult {
        let candidates: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let fs = self.state.explorer.fs();
        let is_drop = !candidates.is_empty()
            && candidates
                .iter()
                .all(|line| fs.is_file(&self.state.resolve_path(Path::new(line))));

        if is_drop {
            for line in candidates {
                if let Err(e) = self.open_document_path(Path::new(line)) {
                    self.report(e);
                }
            }
            return DispatchResult::changed(true);
        }

        let text = text.replace("\r\n", "\n");
        let Some(doc) = self.state.active_document_mut() else {
            return DispatchResult::changed(false);
        };
        doc.insert_str(&text, Instant::now());
        DispatchResult::changed(true)
    }

    fn confirm(&mut self, message: String, pending: PendingAction) {
        let dialog = &mut self.state.ui.confirm_dialog;
        dialog.visible = true;
        dialog.message = message;
        dialog.on_confirm = Some(pending);
    }

    fn apply_pending(&mut self, pending: PendingAction) {
        let result = match pending {
            PendingAction::DeleteNode { node } => self.state.explorer.delete_node(node),
            PendingAction::RemoveProject { node } => self
                .state
                .explorer
                .remove_project(node)
                .map(|descriptor| {
                    self.state.recent.remove(&descriptor);
                }),
            PendingAction::DeleteProject { node } => self
                .state
                .explorer
                .delete_project(node)
                .map(|descriptor| {
                    self.state.recent.remove(&descriptor);
                }),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    /// 错误以消息框形式展示，同时写日志
    fn report(&mut self, message: impl fmt::Display) {
        let message = message.to_string();
        tracing::warn!(error = %message, "operation failed");
        self.state.ui.messages.push_back(message);
    }

    /// 相对路径先按 `working_dir` 解析，最近列表里只存绝对路径
    pub fn open_project_path(&mut self, path: &Path) -> Result<(), ExplorerError> {
        let path = self.state.resolve_path(path);
        let opened = self.state.explorer.open_project_file(&path)?;
        self.state.recent.push(path);
        self.state.explorer.tree_mut().set_selected(Some(opened.root));
        if let Some(e) = opened.scan_error {
            self.report(e);
        }
        Ok(())
    }

    /// 已打开的路径直接切换过去
    pub fn open_document_path(&mut self, path: &Path) -> Result<DocumentId, FileError> {
        let resolved = self.state.resolve_path(path);
        let path = resolved.as_path();
        if let Some(idx) = self
            .state
            .documents
            .iter()
            .position(|doc| doc.path() == Some(path))
        {
            self.state.active = Some(idx);
            self.state.ui.focus = FocusTarget::Editor;
            return Ok(self.state.documents[idx].id());
        }
        if !self.state.explorer.fs().is_file(path) {
            return Err(FileError::NotFound(path.to_path_buf()));
        }

        let id = self.state.allocate_document_id();
        let doc = Document::open(
            id,
            path,
            self.state.explorer.fs(),
            &self.state.settings.editor,
        )?;
        self.state.documents.push(doc);
        self.state.active = Some(self.state.documents.len() - 1);
        self.state.ui.focus = FocusTarget::Editor;
        tracing::info!(path = %path.display(), "document opened");
        Ok(id)
    }
}

impl ScriptApi for Store {
    fn open_document(&mut self, path: &Path) -> Result<(), String> {
        self.open_document_path(path)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn open_project(&mut self, path: &Path) -> Result<(), String> {
        self.open_project_path(path).map_err(|e| e.to_string())
    }

    fn refresh(&mut self) -> Result<(), String> {
        self.state
            .explorer
            .refresh_projects()
            .map_err(|e| e.to_string())
    }

    fn show_message(&mut self, text: &str) {
        self.state.ui.messages.push_back(text.to_string());
    }

    fn insert_text(&mut self, text: &str) -> Result<(), String> {
        let doc = self
            .state
            .active_document_mut()
            .ok_or_else(|| "no active document".to_string())?;
        doc.insert_str(text, Instant::now());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
