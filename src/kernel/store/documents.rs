use crate::kernel::editor::{Document, DocumentId};
use crate::kernel::{Action, FocusTarget, InputDialogKind};

impl super::Store {
    pub(super) fn new_untitled_document(&mut self) -> DocumentId {
        let id = self.state.allocate_document_id();
        let title = self.state.next_untitled_title();
        let doc = Document::untitled(id, title, &self.state.settings.editor);
        self.state.documents.push(doc);
        self.state.active = Some(self.state.documents.len() - 1);
        self.state.ui.focus = FocusTarget::Editor;
        id
    }

    /// 无路径的文档转去询问保存路径
    pub(super) fn save_document(&mut self, id: DocumentId) -> bool {
        let Some(idx) = self.state.document_index(id) else {
            return false;
        };
        let fs = self.state.explorer.fs();
        match self.state.documents[idx].save(fs) {
            Ok(true) => true,
            Ok(false) => {
                self.prompt_save_as(id, false);
                false
            }
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    pub(super) fn prompt_save_as(&mut self, id: DocumentId, then_close: bool) {
        let value = self
            .state
            .document(id)
            .and_then(Document::path)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.state.ui.input_dialog.open(
            "Save As",
            value,
            InputDialogKind::SaveAs { doc: id, then_close },
        );
    }

    /// 依次关闭；有未保存修改的弹出提示，取消则放弃剩下的
    pub(super) fn request_close(&mut self, ids: Vec<DocumentId>) {
        self.state.ui.close_queue.clear();
        self.state.ui.close_queue.extend(ids);
        self.advance_close_queue();
    }

    pub(super) fn advance_close_queue(&mut self) {
        while let Some(id) = self.state.ui.close_queue.pop_front() {
            let Some(doc) = self.state.document(id) else {
                continue;
            };
            if doc.is_changed() {
                let message = format!("Save changes to {}?", doc.title());
                self.state.ui.save_prompt.doc = Some(id);
                self.state.ui.save_prompt.message = message;
                return;
            }
            self.remove_document(id);
        }
    }

    pub(super) fn remove_document(&mut self, id: DocumentId) {
        let Some(idx) = self.state.document_index(id) else {
            return;
        };
        self.state.documents.remove(idx);
        tracing::debug!(doc = id, "document closed");

        let len = self.state.documents.len();
        self.state.active = match self.state.active {
            _ if len == 0 => None,
            Some(active) if active > idx => Some(active - 1),
            Some(active) => Some(active.min(len - 1)),
            None => Some(0),
        };

        // 最后一个文档关掉即退出
        if len == 0 {
            self.state.ui.should_quit = true;
        }
    }

    pub(super) fn reduce_save_prompt_action(&mut self, action: Action) -> super::DispatchResult {
        let Some(id) = self.state.ui.save_prompt.doc.take() else {
            return super::DispatchResult::changed(false);
        };
        self.state.ui.save_prompt.message.clear();

        match action {
            Action::SavePromptSave => {
                let Some(doc) = self.state.document(id) else {
                    self.advance_close_queue();
                    return super::DispatchResult::changed(true);
                };
                if doc.path().is_none() {
                    self.prompt_save_as(id, true);
                    return super::DispatchResult::changed(true);
                }
                if self.save_document(id) {
                    self.remove_document(id);
                    self.advance_close_queue();
                } else {
                    self.state.ui.close_queue.clear();
                }
            }
            Action::SavePromptDiscard => {
                self.remove_document(id);
                self.advance_close_queue();
            }
            Action::SavePromptCancel => {
                self.state.ui.close_queue.clear();
            }
            _ => unreachable!("non-save-prompt action passed to reduce_save_prompt_action"),
        }
        super::DispatchResult::changed(true)
    }

    pub(super) fn finish_save_as(
        &mut self,
        id: DocumentId,
        path: &std::path::Path,
        then_close: bool,
    ) {
        let Some(idx) = self.state.document_index(id) else {
            return;
        };
        let fs = self.state.explorer.fs();
        if let Err(e) = self.state.documents[idx].save_as(path, fs) {
            self.report(e);
            self.state.ui.close_queue.clear();
            return;
        }
        if then_close {
            self.remove_document(id);
            self.advance_close_queue();
        }
    }
}
