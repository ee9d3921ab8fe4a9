//! 命令系统：语义命令定义
//!
//! Command 只描述"做什么"，按键到命令的映射在 keybinding 里。
//! `name()` / `from_name()` 用于快捷键文件。

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== 光标移动 ====================
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorLineStart,
    CursorLineEnd,

    // ==================== 编辑操作 ====================
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // ==================== 文档 ====================
    NewFile,
    OpenFile,
    Save,
    SaveAs,
    CloseTab,
    CloseOthers,
    CloseAll,
    NextTab,
    PrevTab,
    SetSyntax,
    ToggleHiddenChars,
    ToggleLineNumbers,

    // ==================== 项目 ====================
    NewProject,
    OpenProject,
    RefreshProjects,
    CloseProject,
    RemoveProject,
    DeleteProject,
    Build,

    // ==================== 项目树 ====================
    ExplorerUp,
    ExplorerDown,
    ExplorerActivate,
    ExplorerCollapse,
    ExplorerNewFile,
    ExplorerNewFolder,
    ExplorerRename,
    ExplorerDelete,
    ExplorerDuplicate,
    ExplorerImportFile,
    ExplorerImportFolder,

    // ==================== 系统操作 ====================
    RunScript,
    ToggleSidebar,
    FocusExplorer,
    FocusEditor,
    FocusNext,
    Quit,
}

impl Command {
    /// 可以出现在快捷键文件里的命令（`InsertChar` 除外）
    pub const BINDABLE: [Command; 46] = [
        Command::CursorLeft,
        Command::CursorRight,
        Command::CursorUp,
        Command::CursorDown,
        Command::CursorLineStart,
        Command::CursorLineEnd,
        Command::InsertNewline,
        Command::InsertTab,
        Command::DeleteBackward,
        Command::DeleteForward,
        Command::NewFile,
        Command::OpenFile,
        Command::Save,
        Command::SaveAs,
        Command::CloseTab,
        Command::CloseOthers,
        Command::CloseAll,
        Command::NextTab,
        Command::PrevTab,
        Command::SetSyntax,
        Command::ToggleHiddenChars,
        Command::ToggleLineNumbers,
        Command::NewProject,
        Command::OpenProject,
        Command::RefreshProjects,
        Command::CloseProject,
        Command::RemoveProject,
        Command::DeleteProject,
        Command::Build,
        Command::ExplorerUp,
        Command::ExplorerDown,
        Command::ExplorerActivate,
        Command::ExplorerCollapse,
        Command::ExplorerNewFile,
        Command::ExplorerNewFolder,
        Command::ExplorerRename,
        Command::ExplorerDelete,
        Command::ExplorerDuplicate,
        Command::ExplorerImportFile,
        Command::ExplorerImportFolder,
        Command::RunScript,
        Command::ToggleSidebar,
        Command::FocusExplorer,
        Command::FocusEditor,
        Command::FocusNext,
        Command::Quit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::CursorLeft => "cursorLeft",
            Command::CursorRight => "cursorRight",
            Command::CursorUp => "cursorUp",
            Command::CursorDown => "cursorDown",
            Command::CursorLineStart => "cursorLineStart",
            Command::CursorLineEnd => "cursorLineEnd",
            Command::InsertChar(_) => "insertChar",
            Command::InsertNewline => "insertNewline",
            Command::InsertTab => "insertTab",
            Command::DeleteBackward => "deleteBackward",
            Command::DeleteForward => "deleteForward",
            Command::NewFile => "newFile",
            Command::OpenFile => "openFile",
            Command::Save => "save",
            Command::SaveAs => "saveAs",
            Command::CloseTab => "closeTab",
            Command::CloseOthers => "closeOthers",
            Command::CloseAll => "closeAll",
            Command::NextTab => "nextTab",
            Command::PrevTab => "prevTab",
            Command::SetSyntax => "setSyntax",
            Command::ToggleHiddenChars => "toggleHiddenChars",
            Command::ToggleLineNumbers => "toggleLineNumbers",
            Command::NewProject => "newProject",
            Command::OpenProject => "openProject",
            Command::RefreshProjects => "refreshProjects",
            Command::CloseProject => "closeProject",
            Command::RemoveProject => "removeProject",
            Command::DeleteProject => "deleteProject",
            Command::Build => "build",
            Command::ExplorerUp => "explorerUp",
            Command::ExplorerDown => "explorerDown",
            Command::ExplorerActivate => "explorerActivate",
            Command::ExplorerCollapse => "explorerCollapse",
            Command::ExplorerNewFile => "explorerNewFile",
            Command::ExplorerNewFolder => "explorerNewFolder",
            Command::ExplorerRename => "explorerRename",
            Command::ExplorerDelete => "explorerDelete",
            Command::ExplorerDuplicate => "explorerDuplicate",
            Command::ExplorerImportFile => "explorerImportFile",
            Command::ExplorerImportFolder => "explorerImportFolder",
            Command::RunScript => "runScript",
            Command::ToggleSidebar => "toggleSidebar",
            Command::FocusExplorer => "focusExplorer",
            Command::FocusEditor => "focusEditor",
            Command::FocusNext => "focusNext",
            Command::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        let name = name.trim();
        Self::BINDABLE
            .iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn is_edit_command(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::InsertNewline
                | Command::InsertTab
                | Command::DeleteBackward
                | Command::DeleteForward
        )
    }

    pub fn is_cursor_command(&self) -> bool {
        matches!(
            self,
            Command::CursorLeft
                | Command::CursorRight
                | Command::CursorUp
                | Command::CursorDown
                | Command::CursorLineStart
                | Command::CursorLineEnd
        )
    }

    pub fn is_explorer_command(&self) -> bool {
        self.name().starts_with("explorer")
    }
}
