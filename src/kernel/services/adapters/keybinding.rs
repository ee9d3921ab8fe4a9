//! 快捷键：按键 → 命令（支持上下文）

use crate::core::event::Key;
use crate::core::Command;
use crossterm::event::KeyCode;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindingContext {
    Global,
    Editor,
    Explorer,
}

impl KeybindingContext {
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        match v.as_str() {
            "global" => Some(Self::Global),
            "editor" => Some(Self::Editor),
            "explorer" | "tree" | "projects" => Some(Self::Explorer),
            _ => None,
        }
    }
}

pub struct KeybindingService {
    global: FxHashMap<Key, Command>,
    editor: FxHashMap<Key, Command>,
    explorer: FxHashMap<Key, Command>,
}

impl KeybindingService {
    pub fn new() -> Self {
        Self::with_defaults()
    }

    pub fn with_defaults() -> Self {
        Self {
            global: default_global_keybindings(),
            editor: default_editor_keybindings(),
            explorer: default_explorer_keybindings(),
        }
    }

    /// 上下文里没有的按键退回全局表
    pub fn resolve(&self, context: KeybindingContext, key: &Key) -> Option<&Command> {
        match context {
            KeybindingContext::Global => self.global.get(key),
            KeybindingContext::Editor => self.editor.get(key).or_else(|| self.global.get(key)),
            KeybindingContext::Explorer => {
                self.explorer.get(key).or_else(|| self.global.get(key))
            }
        }
    }

    pub fn bindings(&self, context: KeybindingContext) -> &FxHashMap<Key, Command> {
        match context {
            KeybindingContext::Global => &self.global,
            KeybindingContext::Editor => &self.editor,
            KeybindingContext::Explorer => &self.explorer,
        }
    }

    pub fn bind(&mut self, context: KeybindingContext, key: Key, command: Command) {
        self.map_mut(context).insert(key, command);
    }

    pub fn unbind(&mut self, context: KeybindingContext, key: &Key) -> Option<Command> {
        self.map_mut(context).remove(key)
    }

    fn map_mut(&mut self, context: KeybindingContext) -> &mut FxHashMap<Key, Command> {
        match context {
            KeybindingContext::Global => &mut self.global,
            KeybindingContext::Editor => &mut self.editor,
            KeybindingContext::Explorer => &mut self.explorer,
        }
    }
}

impl Default for KeybindingService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_global_keybindings() -> FxHashMap<Key, Command> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(32);

    bindings.insert(Key::ctrl(KeyCode::Char('q')), Command::Quit);
    bindings.insert(Key::ctrl(KeyCode::Char('n')), Command::NewFile);
    bindings.insert(Key::ctrl(KeyCode::Char('o')), Command::OpenFile);
    bindings.insert(Key::ctrl(KeyCode::Char('s')), Command::Save);
    bindings.insert(Key::ctrl_shift(KeyCode::Char('s')), Command::SaveAs);
    bindings.insert(Key::ctrl(KeyCode::Char('w')), Command::CloseTab);
    bindings.insert(Key::ctrl_shift(KeyCode::Char('w')), Command::CloseAll);
    bindings.insert(Key::alt(KeyCode::Char('w')), Command::CloseOthers);
    bindings.insert(Key::ctrl(KeyCode::PageDown), Command::NextTab);
    bindings.insert(Key::ctrl(KeyCode::PageUp), Command::PrevTab);
    bindings.insert(Key::alt(KeyCode::Right), Command::NextTab);
    bindings.insert(Key::alt(KeyCode::Left), Command::PrevTab);

    bindings.insert(Key::ctrl(KeyCode::Char('l')), Command::SetSyntax);
    bindings.insert(Key::alt(KeyCode::Char('h')), Command::ToggleHiddenChars);
    bindings.insert(Key::alt(KeyCode::Char('n')), Command::ToggleLineNumbers);

    bindings.insert(Key::ctrl_shift(KeyCode::Char('n')), Command::NewProject);
    bindings.insert(Key::ctrl_shift(KeyCode::Char('o')), Command::OpenProject);
    bindings.insert(Key::simple(KeyCode::F(5)), Command::RefreshProjects);
    bindings.insert(Key::simple(KeyCode::F(7)), Command::Build);
    bindings.insert(Key::ctrl(KeyCode::Char('r')), Command::RunScript);

    bindings.insert(Key::ctrl(KeyCode::Char('b')), Command::ToggleSidebar);
    bindings.insert(Key::ctrl(KeyCode::Char('e')), Command::FocusExplorer);
    bindings.insert(Key::simple(KeyCode::F(6)), Command::FocusNext);

    bindings
}

fn default_editor_keybindings() -> FxHashMap<Key, Command> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(16);

    bindings.insert(Key::simple(KeyCode::Left), Command::CursorLeft);
    bindings.insert(Key::simple(KeyCode::Right), Command::CursorRight);
    bindings.insert(Key::simple(KeyCode::Up), Command::CursorUp);
    bindings.insert(Key::simple(KeyCode::Down), Command::CursorDown);
    bindings.insert(Key::simple(KeyCode::Home), Command::CursorLineStart);
    bindings.insert(Key::simple(KeyCode::End), Command::CursorLineEnd);

    bindings.insert(Key::simple(KeyCode::Enter), Command::InsertNewline);
    bindings.insert(Key::simple(KeyCode::Tab), Command::InsertTab);
    bindings.insert(Key::simple(KeyCode::Backspace), Command::DeleteBackward);
    bindings.insert(Key::simple(KeyCode::Delete), Command::DeleteForward);

    bindings
}

fn default_explorer_keybindings() -> FxHashMap<Key, Command> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(16);

    bindings.insert(Key::simple(KeyCode::Up), Command::ExplorerUp);
    bindings.insert(Key::simple(KeyCode::Down), Command::ExplorerDown);
    bindings.insert(Key::simple(KeyCode::Enter), Command::ExplorerActivate);
    bindings.insert(Key::simple(KeyCode::Right), Command::ExplorerActivate);
    bindings.insert(Key::simple(KeyCode::Left), Command::ExplorerCollapse);
    bindings.insert(Key::simple(KeyCode::Char('a')), Command::ExplorerNewFile);
    bindings.insert(Key::shift(KeyCode::Char('a')), Command::ExplorerNewFolder);
    bindings.insert(Key::simple(KeyCode::F(2)), Command::ExplorerRename);
    bindings.insert(Key::simple(KeyCode::Delete), Command::ExplorerDelete);
    bindings.insert(Key::simple(KeyCode::Char('d')), Command::ExplorerDuplicate);
    bindings.insert(Key::simple(KeyCode::Char('i')), Command::ExplorerImportFile);
    bindings.insert(Key::shift(KeyCode::Char('i')), Command::ExplorerImportFolder);
    bindings.insert(Key::simple(KeyCode::Char('c')), Command::CloseProject);
    bindings.insert(Key::simple(KeyCode::Char('r')), Command::RemoveProject);
    bindings.insert(Key::shift(KeyCode::Delete), Command::DeleteProject);
    bindings.insert(Key::simple(KeyCode::Esc), Command::FocusEditor);

    bindings
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/keybinding.rs"]
mod tests;
