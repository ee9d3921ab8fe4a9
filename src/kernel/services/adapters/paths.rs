//! 每用户配置目录
//!
//! - `QUIRE_CONFIG_DIR` 设置时直接使用
//! - macOS: ~/Library/Application Support/quire
//! - Linux: $XDG_CONFIG_HOME/quire 或 ~/.config/quire
//! - Windows: %APPDATA%\quire

use std::path::PathBuf;

const APP_NAME: &str = "quire";
const CONFIG_DIR_ENV: &str = "QUIRE_CONFIG_DIR";
const LOG_DIR: &str = "logs";

pub fn get_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    platform_config_dir().map(|dir| dir.join(APP_NAME))
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg));
            }
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"))
    }
}

pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = get_config_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine config directory",
        )
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(LOG_DIR))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine log directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
