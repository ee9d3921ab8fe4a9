use crate::core::Command;
use crate::kernel::{FocusTarget, InputDialogKind, PendingAction};
use crate::models::NodeTag;

impl super::Store {
    pub(super) fn explorer_command(&mut self, command: Command) -> super::DispatchResult {
        match command {
            Command::ExplorerUp => super::DispatchResult::changed(
                self.state.explorer.tree_mut().move_selection(-1),
            ),
            Command::ExplorerDown => super::DispatchResult::changed(
                self.state.explorer.tree_mut().move_selection(1),
            ),
            Command::ExplorerActivate => {
                let Some(node) = self.state.selected_node() else {
                    return super::DispatchResult::changed(false);
                };
                match self.state.explorer.activate(node) {
                    Ok(Some(path)) => {
                        if let Err(e) = self.open_document_path(&path) {
                            self.report(e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => self.report(e),
                }
                super::DispatchResult::changed(true)
            }
            Command::ExplorerCollapse => {
                let Some(node) = self.state.selected_node() else {
                    return super::DispatchResult::changed(false);
                };
                let tree = self.state.explorer.tree_mut();
                if tree.is_expanded(node) {
                    tree.collapse(node);
                    return super::DispatchResult::changed(true);
                }
                match tree.parent(node) {
                    Some(parent) => {
                        tree.set_selected(Some(parent));
                        super::DispatchResult::changed(true)
                    }
                    None => super::DispatchResult::changed(false),
                }
            }
            Command::ExplorerNewFile
            | Command::ExplorerNewFolder
            | Command::ExplorerImportFile
            | Command::ExplorerImportFolder => {
                let Some(parent) = self
                    .state
                    .selected_node()
                    .and_then(|node| self.state.explorer.container_of(node))
                else {
                    self.report("Select a project or folder first");
                    return super::DispatchResult::changed(true);
                };
                let (title, kind) = match command {
                    Command::ExplorerNewFile => ("New File", InputDialogKind::NewFile { parent }),
                    Command::ExplorerNewFolder => {
                        ("New Folder", InputDialogKind::NewFolder { parent })
                    }
                    Command::ExplorerImportFile => {
                        ("Import File", InputDialogKind::ImportFile { parent })
                    }
                    _ => ("Import Folder", InputDialogKind::ImportFolder { parent }),
                };
                self.state.ui.input_dialog.open(title, String::new(), kind);
                super::DispatchResult::changed(true)
            }
            Command::ExplorerRename => {
                let Some(node) = self.state.selected_node() else {
                    return super::DispatchResult::changed(false);
                };
                let tree = self.state.explorer.tree();
                if tree.tag(node) == Some(NodeTag::Project) {
                    self.report("Project nodes cannot be renamed");
                    return super::DispatchResult::changed(true);
                }
                let value = tree.text(node).unwrap_or_default().to_string();
                self.state
                    .ui
                    .input_dialog
                    .open("Rename", value, InputDialogKind::Rename { node });
                super::DispatchResult::changed(true)
            }
            Command::ExplorerDelete => {
                let Some(node) = self.state.selected_node() else {
                    return super::DispatchResult::changed(false);
                };
                let tree = self.state.explorer.tree();
                if tree.tag(node) == Some(NodeTag::Project) {
                    self.report("Use Delete Project to delete a whole project");
                    return super::DispatchResult::changed(true);
                }
                let message = format!("Delete '{}'?", tree.text(node).unwrap_or_default());
                self.confirm(message, PendingAction::DeleteNode { node });
                super::DispatchResult::changed(true)
            }
            Command::ExplorerDuplicate => {
                let Some(node) = self.state.selected_node() else {
                    return super::DispatchResult::changed(false);
                };
                if let Err(e) = self.state.explorer.duplicate_file(node) {
                    self.report(e);
                }
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::changed(false),
        }
    }

    /// 重命名目录后子节点路径过期，整棵树刷新
    pub(super) fn rename_selected(&mut self, node: crate::models::NodeId, name: &str) {
        let was_folder = self.state.explorer.tree().tag(node) == Some(NodeTag::Folder);
        let old_path = self
            .state
            .explorer
            .tree()
            .path(node)
            .map(std::path::Path::to_path_buf);

        let new_path = match self.state.explorer.rename_node(node, name) {
            Ok(path) => path,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        if was_folder {
            if let Err(e) = self.state.explorer.refresh_projects() {
                self.report(e);
            }
            return;
        }

        // 打开着的同一文件跟着改名
        if let Some(old_path) = old_path {
            if let Some(idx) = self
                .state
                .documents
                .iter()
                .position(|doc| doc.path() == Some(old_path.as_path()))
            {
                self.state.documents[idx].set_path(new_path);
            }
        }
        self.state.ui.focus = FocusTarget::Explorer;
    }
}
