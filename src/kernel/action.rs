use std::path::PathBuf;
use std::time::Instant;

use crate::core::Command;

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),
    /// 粘贴内容；全部是已存在的文件路径时当作拖入文件
    Paste(String),
    OpenPaths(Vec<PathBuf>),
    Tick {
        now: Instant,
    },
    ShowMessage(String),
    DismissMessage,
    SetActiveDocument {
        index: usize,
    },
    ExplorerSelectRow {
        row: usize,
    },
    InputDialogAppend(char),
    InputDialogBackspace,
    InputDialogCursorLeft,
    InputDialogCursorRight,
    InputDialogAccept,
    InputDialogCancel,
    ConfirmDialogAccept,
    ConfirmDialogCancel,
    SavePromptSave,
    SavePromptDiscard,
    SavePromptCancel,
}
