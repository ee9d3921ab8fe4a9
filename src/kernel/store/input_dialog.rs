use std::path::Path;

use crate::kernel::language::LanguageId;
use crate::kernel::{Action, Effect, FocusTarget, InputDialogKind};
use crate::models::project::is_plain_file_name;
use crate::models::Project;

impl super::Store {
    pub(super) fn reduce_input_dialog_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::InputDialogAppend(ch) => {
                let dialog = &mut self.state.ui.input_dialog;
                if !dialog.visible {
                    return super::DispatchResult::changed(false);
                }

                dialog.error = None;
                if dialog.cursor > dialog.value.len() {
                    dialog.cursor = dialog.value.len();
                }
                dialog.value.insert(dialog.cursor, ch);
                dialog.cursor += ch.len_utf8();
                super::DispatchResult::changed(true)
            }
            Action::InputDialogBackspace => {
                let dialog = &mut self.state.ui.input_dialog;
                if !dialog.visible || dialog.cursor == 0 {
                    return super::DispatchResult::changed(false);
                }

                dialog.error = None;
                let prev = dialog.value[..dialog.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                dialog.value.drain(prev..dialog.cursor);
                dialog.cursor = prev;
                super::DispatchResult::changed(true)
            }
            Action::InputDialogCursorLeft => {
                let dialog = &mut self.state.ui.input_dialog;
                if !dialog.visible || dialog.cursor == 0 {
                    return super::DispatchResult::changed(false);
                }

                let prev = dialog.value[..dialog.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                let changed = prev != dialog.cursor;
                dialog.cursor = prev;
                super::DispatchResult::changed(changed)
            }
            Action::InputDialogCursorRight => {
                let dialog = &mut self.state.ui.input_dialog;
                if !dialog.visible || dialog.cursor >= dialog.value.len() {
                    return super::DispatchResult::changed(false);
                }

                let next = dialog.value[dialog.cursor..]
                    .chars()
                    .next()
                    .map(|ch| dialog.cursor + ch.len_utf8())
                    .unwrap_or(dialog.value.len());
                let changed = next != dialog.cursor;
                dialog.cursor = next;
                super::DispatchResult::changed(changed)
            }
            Action::InputDialogAccept => self.accept_input_dialog(),
            Action::InputDialogCancel => {
                let dialog = &mut self.state.ui.input_dialog;
                if !dialog.visible {
                    return super::DispatchResult::changed(false);
                }
                // 关闭流程里的"另存为"被取消，等同于取消整个关闭
                if matches!(
                    dialog.kind,
                    Some(InputDialogKind::SaveAs {
                        then_close: true,
                        ..
                    })
                ) {
                    self.state.ui.close_queue.clear();
                }
                self.state.ui.input_dialog.reset();
                super::DispatchResult::changed(true)
            }
            _ => unreachable!("non-input-dialog action passed to reduce_input_dialog_action"),
        }
    }

    fn accept_input_dialog(&mut self) -> super::DispatchResult {
        let dialog = &mut self.state.ui.input_dialog;
        if !dialog.visible {
            return super::DispatchResult::changed(false);
        }
        let Some(kind) = dialog.kind.as_ref() else {
            dialog.reset();
            return super::DispatchResult::changed(true);
        };

        let value = dialog.value.trim();
        if let Some(error) = validate(kind, value) {
            let prev = dialog.error.replace(error.to_string());
            return super::DispatchResult::changed(prev.as_deref() != dialog.error.as_deref());
        }

        let value = value.to_string();
        let kind = dialog.kind.take();
        dialog.reset();
        let Some(kind) = kind else {
            return super::DispatchResult::changed(true);
        };

        let mut effects = Vec::new();
        match kind {
            InputDialogKind::NewFile { parent } => {
                match self.state.explorer.add_new_file(parent, &value) {
                    Ok(_) => self.state.ui.focus = FocusTarget::Explorer,
                    Err(e) => self.report(e),
                }
            }
            InputDialogKind::NewFolder { parent } => {
                if let Err(e) = self.state.explorer.add_new_folder(parent, &value) {
                    self.report(e);
                }
            }
            InputDialogKind::Rename { node } => self.rename_selected(node, &value),
            InputDialogKind::ImportFile { parent } => {
                let source = self.state.resolve_path(Path::new(&value));
                if let Err(e) = self.state.explorer.import_file(parent, &source) {
                    self.report(e);
                }
            }
            InputDialogKind::ImportFolder { parent } => {
                let source = self.state.resolve_path(Path::new(&value));
                if let Err(e) = self.state.explorer.import_folder(parent, &source) {
                    self.report(e);
                }
            }
            InputDialogKind::OpenFile => {
                if let Err(e) = self.open_document_path(Path::new(&value)) {
                    self.report(e);
                }
            }
            InputDialogKind::OpenProject => {
                if let Err(e) = self.open_project_path(Path::new(&value)) {
                    self.report(e);
                }
            }
            InputDialogKind::RunScript => {
                let script = self.state.resolve_path(Path::new(&value));
                effects.push(Effect::RunScript(script));
            }
            InputDialogKind::SetSyntax { doc } => {
                let language = LanguageId::from_name(&value);
                if let Some(doc) = self.state.document_mut(doc) {
                    doc.set_syntax_override(language);
                }
            }
            InputDialogKind::SaveAs { doc, then_close } => {
                let path = self.state.resolve_path(Path::new(&value));
                self.finish_save_as(doc, &path, then_close);
            }
            InputDialogKind::NewProjectName => {
                self.state.ui.input_dialog.open(
                    "New Project: folder",
                    String::new(),
                    InputDialogKind::NewProjectFolder { name: value },
                );
            }
            InputDialogKind::NewProjectFolder { name } => {
                self.state.ui.input_dialog.open(
                    "New Project: build command (optional)",
                    String::new(),
                    InputDialogKind::NewProjectBuild {
                        name,
                        folder: self.state.resolve_path(Path::new(&value)),
                    },
                );
            }
            InputDialogKind::NewProjectBuild { name, folder } => {
                let build = Some(value).filter(|cmd| !cmd.is_empty());
                match Project::create(&folder, &name, build) {
                    Ok(project) => {
                        let descriptor = project.project_file.clone();
                        let opened = self.state.explorer.open_project(project);
                        self.state.recent.push(descriptor);
                        self.state
                            .explorer
                            .tree_mut()
                            .set_selected(Some(opened.root));
                        if let Some(e) = opened.scan_error {
                            self.report(e);
                        }
                    }
                    Err(e) => self.report(e),
                }
            }
        }

        super::DispatchResult {
            effects,
            state_changed: true,
        }
    }
}

/// 返回要显示在对话框里的错误
fn validate(kind: &InputDialogKind, value: &str) -> Option<&'static str> {
    match kind {
        InputDialogKind::NewFile { .. }
        | InputDialogKind::NewFolder { .. }
        | InputDialogKind::Rename { .. }
        | InputDialogKind::NewProjectName => {
            if value.is_empty() {
                Some("Name required")
            } else if !is_plain_file_name(value) {
                Some("Invalid name")
            } else {
                None
            }
        }
        InputDialogKind::SetSyntax { .. } => {
            if !value.is_empty() && LanguageId::from_name(value).is_none() {
                Some("Unknown language")
            } else {
                None
            }
        }
        InputDialogKind::NewProjectBuild { .. } => None,
        InputDialogKind::ImportFile { .. }
        | InputDialogKind::ImportFolder { .. }
        | InputDialogKind::OpenFile
        | InputDialogKind::OpenProject
        | InputDialogKind::RunScript
        | InputDialogKind::SaveAs { .. }
        | InputDialogKind::NewProjectFolder { .. } => {
            if value.is_empty() {
                Some("Path required")
            } else {
                None
            }
        }
    }
}
