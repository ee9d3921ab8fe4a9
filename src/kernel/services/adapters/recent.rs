//! 最近打开的项目：配置目录下的 `recent-projects`，每行一个描述文件路径

use crate::models::RecentProjects;
use std::io;
use std::path::{Path, PathBuf};

const RECENT_FILE: &str = "recent-projects";

pub fn get_recent_projects_path() -> Option<PathBuf> {
    super::paths::get_config_dir().map(|dir| dir.join(RECENT_FILE))
}

/// 文件不存在时静默返回空列表；其他读取错误记一条警告后同样返回空列表
pub fn load_recent_projects(path: &Path) -> RecentProjects {
    match std::fs::read(path) {
        Ok(data) => parse_recent_projects(&data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => RecentProjects::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read recent projects");
            RecentProjects::new()
        }
    }
}

/// 每行原样作为路径，只去掉行尾的 `\r`；空行跳过
pub fn parse_recent_projects(data: &[u8]) -> RecentProjects {
    RecentProjects::from_paths(
        data.split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(path_from_bytes),
    )
}

/// 整个文件重写
pub fn save_recent_projects(path: &Path, recent: &RecentProjects) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut content = Vec::new();
    for entry in recent.iter() {
        content.extend_from_slice(&path_to_bytes(entry));
        content.push(b'\n');
    }
    std::fs::write(path, content)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/recent.rs"]
mod tests;
