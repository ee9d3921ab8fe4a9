use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};

use crate::kernel::editor::{Document, DocumentId};
use crate::kernel::explorer::ProjectExplorer;
use crate::kernel::services::ports::Settings;
use crate::models::{NodeId, RecentProjects};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Explorer,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDialogKind {
    NewFile { parent: NodeId },
    NewFolder { parent: NodeId },
    Rename { node: NodeId },
    ImportFile { parent: NodeId },
    ImportFolder { parent: NodeId },
    OpenFile,
    OpenProject,
    RunScript,
    SetSyntax { doc: DocumentId },
    /// `then_close`：来自关闭提示的"保存"，保存后继续关闭
    SaveAs { doc: DocumentId, then_close: bool },
    NewProjectName,
    NewProjectFolder { name: String },
    NewProjectBuild { name: String, folder: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct InputDialogState {
    pub visible: bool,
    pub title: String,
    pub value: String,
    pub cursor: usize,
    pub error: Option<String>,
    pub kind: Option<InputDialogKind>,
}

impl InputDialogState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn open(&mut self, title: impl Into<String>, value: String, kind: InputDialogKind) {
        self.visible = true;
        self.title = title.into();
        self.cursor = value.len();
        self.value = value;
        self.error = None;
        self.kind = Some(kind);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteNode { node: NodeId },
    RemoveProject { node: NodeId },
    DeleteProject { node: NodeId },
}

/// 是 / 否 确认框
#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

/// 关闭有未保存修改的文档时的 保存 / 不保存 / 取消
#[derive(Debug, Clone, Default)]
pub struct SavePromptState {
    pub doc: Option<DocumentId>,
    pub message: String,
}

impl SavePromptState {
    pub fn visible(&self) -> bool {
        self.doc.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_visible: bool,
    pub focus: FocusTarget,
    pub show_line_numbers: bool,
    pub hidden_chars: bool,
    pub input_dialog: InputDialogState,
    pub confirm_dialog: ConfirmDialogState,
    pub save_prompt: SavePromptState,
    /// 阻塞式消息框，依次显示
    pub messages: VecDeque<String>,
    /// 批量关闭时尚未处理的文档
    pub close_queue: VecDeque<DocumentId>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            focus: FocusTarget::Editor,
            show_line_numbers: true,
            hidden_chars: false,
            input_dialog: InputDialogState::default(),
            confirm_dialog: ConfirmDialogState::default(),
            save_prompt: SavePromptState::default(),
            messages: VecDeque::new(),
            close_queue: VecDeque::new(),
            should_quit: false,
        }
    }
}

impl UiState {
    /// 有任何模态框时按键只交给它
    pub fn has_modal(&self) -> bool {
        !self.messages.is_empty()
            || self.save_prompt.visible()
            || self.confirm_dialog.visible
            || self.input_dialog.visible
    }
}

pub struct AppState {
    pub explorer: ProjectExplorer,
    pub documents: Vec<Document>,
    pub active: Option<usize>,
    pub recent: RecentProjects,
    pub settings: Settings,
    pub ui: UiState,
    /// 对话框里输入的相对路径以此为基准
    pub working_dir: PathBuf,
    next_document_id: DocumentId,
    untitled_counter: usize,
}

impl AppState {
    pub fn new(explorer: ProjectExplorer, settings: Settings, recent: RecentProjects) -> Self {
        let ui = UiState {
            show_line_numbers: settings.editor.show_line_numbers,
            hidden_chars: settings.editor.hidden_chars,
            ..UiState::default()
        };
        Self {
            explorer,
            documents: Vec::new(),
            active: None,
            recent,
            settings,
            ui,
            working_dir: std::env::current_dir().unwrap_or_default(),
            next_document_id: 1,
            untitled_counter: 0,
        }
    }

    /// 相对路径接到 `working_dir` 之后，并去掉 `.` 分量
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        joined
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }

    pub fn allocate_document_id(&mut self) -> DocumentId {
        let id = self.next_document_id;
        self.next_document_id += 1;
        id
    }

    pub fn next_untitled_title(&mut self) -> String {
        self.untitled_counter += 1;
        format!("untitled-{}", self.untitled_counter)
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|idx| self.documents.get(idx))
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.active.and_then(|idx| self.documents.get_mut(idx))
    }

    pub fn document_index(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id() == id)
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.explorer.tree().selected()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
