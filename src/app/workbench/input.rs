use super::util;
use super::Workbench;
use crate::core::event::{text_char, InputEvent, Key};
use crate::core::Command;
use crate::kernel::services::adapters::KeybindingContext;
use crate::kernel::{Action as KernelAction, FocusTarget};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

pub(super) fn handle_input(workbench: &mut Workbench, event: &InputEvent) -> bool {
    match event {
        InputEvent::Paste(text) => {
            if workbench.store.state().ui.input_dialog.visible {
                // 对话框里粘贴只取第一行
                let line = text.lines().next().unwrap_or_default();
                let mut changed = false;
                for ch in line.chars() {
                    changed |= workbench.dispatch_kernel(KernelAction::InputDialogAppend(ch));
                }
                return changed;
            }
            if workbench.store.state().ui.has_modal() {
                return false;
            }
            workbench.dispatch_kernel(KernelAction::Paste(text.clone()))
        }
        InputEvent::Mouse(mouse) => handle_mouse(workbench, mouse),
        InputEvent::Resize(..) => true,
        InputEvent::FocusGained | InputEvent::FocusLost => false,
        InputEvent::Key(_) => match event.as_key_press() {
            Some(key) => handle_key(workbench, key),
            None => false,
        },
    }
}

fn handle_key(workbench: &mut Workbench, event: &KeyEvent) -> bool {
    if let Some(action) = modal_action(workbench, event) {
        return match action {
            Some(action) => workbench.dispatch_kernel(action),
            None => false,
        };
    }

    let context = match workbench.store.state().ui.focus {
        FocusTarget::Explorer => KeybindingContext::Explorer,
        FocusTarget::Editor => KeybindingContext::Editor,
    };
    let key = Key::from(*event);
    if let Some(command) = workbench.keybindings.resolve(context, &key).cloned() {
        return workbench.dispatch_kernel(KernelAction::RunCommand(command));
    }

    if context == KeybindingContext::Editor {
        if let Some(ch) = text_char(event) {
            return workbench.dispatch_kernel(KernelAction::RunCommand(Command::InsertChar(ch)));
        }
    }
    false
}

/// 有模态框时按键只交给最上层那个；`Some(None)` 表示吞掉按键
fn modal_action(workbench: &Workbench, event: &KeyEvent) -> Option<Option<KernelAction>> {
    let ui = &workbench.store.state().ui;

    if !ui.messages.is_empty() {
        let action = matches!(event.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' '))
            .then_some(KernelAction::DismissMessage);
        return Some(action);
    }

    if ui.save_prompt.visible() {
        let action = match event.code {
            KeyCode::Char('s') | KeyCode::Char('y') | KeyCode::Enter => {
                Some(KernelAction::SavePromptSave)
            }
            KeyCode::Char('d') | KeyCode::Char('n') => Some(KernelAction::SavePromptDiscard),
            KeyCode::Char('c') | KeyCode::Esc => Some(KernelAction::SavePromptCancel),
            _ => None,
        };
        return Some(action);
    }

    if ui.confirm_dialog.visible {
        let action = match event.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(KernelAction::ConfirmDialogAccept),
            KeyCode::Char('n') | KeyCode::Esc => Some(KernelAction::ConfirmDialogCancel),
            _ => None,
        };
        return Some(action);
    }

    if ui.input_dialog.visible {
        let action = match event.code {
            KeyCode::Enter => Some(KernelAction::InputDialogAccept),
            KeyCode::Esc => Some(KernelAction::InputDialogCancel),
            KeyCode::Backspace => Some(KernelAction::InputDialogBackspace),
            KeyCode::Left => Some(KernelAction::InputDialogCursorLeft),
            KeyCode::Right => Some(KernelAction::InputDialogCursorRight),
            _ => text_char(event).map(KernelAction::InputDialogAppend),
        };
        return Some(action);
    }

    None
}

fn handle_mouse(workbench: &mut Workbench, event: &MouseEvent) -> bool {
    if workbench.store.state().ui.has_modal() {
        return false;
    }

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            return scroll_editor(workbench, event);
        }
        _ => return false,
    }

    let (x, y) = (event.column, event.row);
    let layout = workbench.layout.clone();

    if let Some(area) = layout.sidebar.filter(|a| util::rect_contains(*a, x, y)) {
        // 边框占一行
        let Some(offset) = y.checked_sub(area.y + 1) else {
            return workbench.dispatch_kernel(KernelAction::RunCommand(Command::FocusExplorer));
        };
        let row = workbench.tree_scroll + offset as usize;
        let selected = workbench.dispatch_kernel(KernelAction::ExplorerSelectRow { row });
        let focused =
            workbench.dispatch_kernel(KernelAction::RunCommand(Command::FocusExplorer));
        return selected || focused;
    }

    if let Some(area) = layout.tabs.filter(|a| util::rect_contains(*a, x, y)) {
        let col = x - area.x;
        if let Some(index) = layout
            .tab_spans
            .iter()
            .position(|&(start, end)| col >= start && col < end)
        {
            return workbench.dispatch_kernel(KernelAction::SetActiveDocument { index });
        }
        return false;
    }

    if layout
        .editor
        .is_some_and(|area| util::rect_contains(area, x, y))
    {
        return workbench.dispatch_kernel(KernelAction::RunCommand(Command::FocusEditor));
    }

    false
}

fn scroll_editor(workbench: &mut Workbench, event: &MouseEvent) -> bool {
    let Some(doc) = workbench.store.state().active_document() else {
        return false;
    };
    let max_row = doc.buffer().len_lines().saturating_sub(1);
    let step = 3usize;
    let row = workbench.scroll.0;
    let next = match event.kind {
        MouseEventKind::ScrollUp => row.saturating_sub(step),
        _ => (row + step).min(max_row),
    };
    if next == row {
        return false;
    }
    workbench.scroll.0 = next;
    true
}
