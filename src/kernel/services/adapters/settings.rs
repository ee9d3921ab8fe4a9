use crate::core::event::Key;
use crate::core::Command;
use crate::kernel::services::adapters::keybinding::{KeybindingContext, KeybindingService};
use crate::kernel::services::ports::settings::Settings;
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";
const KEYS_FILE: &str = "keys";

pub fn get_settings_path() -> Option<PathBuf> {
    super::paths::get_config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub fn get_keys_path() -> Option<PathBuf> {
    super::paths::get_config_dir().map(|dir| dir.join(KEYS_FILE))
}

/// 首次运行时写入默认设置
pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&path, content)?;
    }
    Ok(path)
}

/// 读取失败或格式错误时用默认值
pub fn load_settings(path: &Path) -> Settings {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to read settings");
            }
            return Settings::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings, using defaults");
            Settings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub context: KeybindingContext,
    pub key: Key,
    pub command: Command,
}

/// `key = command` 或 `key = command @ context`；空行和 `#` 注释返回 `Ok(None)`
pub fn parse_hotkey_line(line: &str) -> Result<Option<Hotkey>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (key_part, rest) = line
        .split_once('=')
        .ok_or_else(|| "expected `key = command`".to_string())?;
    let (command_part, context_part) = match rest.split_once('@') {
        Some((command, context)) => (command, Some(context)),
        None => (rest, None),
    };

    let key = parse_keybinding(key_part)
        .ok_or_else(|| format!("unknown key {:?}", key_part.trim()))?;
    let command = Command::from_name(command_part)
        .ok_or_else(|| format!("unknown command {:?}", command_part.trim()))?;
    let context = match context_part {
        Some(ctx) => KeybindingContext::parse(ctx)
            .ok_or_else(|| format!("unknown context {:?}", ctx.trim()))?,
        None => KeybindingContext::Global,
    };

    Ok(Some(Hotkey {
        context,
        key,
        command,
    }))
}

/// 应用整份快捷键文件；坏行跳过并记警告，返回应用的条数
pub fn apply_hotkeys(service: &mut KeybindingService, text: &str) -> usize {
    let mut applied = 0;
    for (idx, line) in text.lines().enumerate() {
        match parse_hotkey_line(line) {
            Ok(Some(hotkey)) => {
                service.bind(hotkey.context, hotkey.key, hotkey.command);
                applied += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(line = idx + 1, error = %e, "skip bad hotkey line"),
        }
    }
    applied
}

pub fn load_hotkeys(service: &mut KeybindingService, path: &Path) {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let applied = apply_hotkeys(service, &text);
            tracing::info!(path = %path.display(), applied, "hotkeys loaded");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to read hotkeys"),
    }
}

pub fn parse_keybinding(value: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part: Option<&str> = None;
    for part in value.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            _ => {
                if key_part.is_some() {
                    return None;
                }
                key_part = Some(part);
            }
        }
    }
    let key_part = key_part?;
    let mut code = parse_key_code(key_part)?;
    if let KeyCode::Char(ch) = code {
        if ch.is_ascii_uppercase() {
            code = KeyCode::Char(ch.to_ascii_lowercase());
            modifiers |= KeyModifiers::SHIFT;
        }
    }
    Some(Key::new(code, modifiers))
}

fn parse_key_code(value: &str) -> Option<KeyCode> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    let v_lc = v.to_ascii_lowercase();
    let code = match v_lc.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ if v_lc.len() > 1 && v_lc.starts_with('f') => {
            let n = v_lc.strip_prefix('f')?.parse::<u8>().ok()?;
            if !(1..=24).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        _ => {
            let mut chars = v.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some(code)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
