//! 项目描述文件模型
//!
//! 描述文件是 JSON：`{ "name": ..., "folder": ..., "build_command": ... }`。
//! `folder` 为相对路径时相对于描述文件所在目录解析；写入时尽量存成相对路径。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const PROJECT_EXTENSION: &str = "qproj";

#[derive(Debug)]
pub enum ProjectError {
    Io(io::Error),
    Parse(serde_json::Error),
    InvalidName(String),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Io(e) => write!(f, "project file error: {}", e),
            ProjectError::Parse(e) => write!(f, "invalid project file: {}", e),
            ProjectError::InvalidName(name) => write!(f, "invalid project name: {:?}", name),
        }
    }
}

impl std::error::Error for ProjectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectError::Io(e) => Some(e),
            ProjectError::Parse(e) => Some(e),
            ProjectError::InvalidName(_) => None,
        }
    }
}

impl From<io::Error> for ProjectError {
    fn from(e: io::Error) -> Self {
        ProjectError::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        ProjectError::Parse(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub folder: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// 描述文件自身的路径，不写入文件
    #[serde(skip)]
    pub project_file: PathBuf,
}

impl Project {
    pub fn read(path: &Path) -> Result<Self, ProjectError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_descriptor(path, &data)
    }

    /// 解析已读入内存的描述文件内容
    pub fn from_descriptor(path: &Path, data: &str) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_str(data)?;
        if project.folder.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            let joined: PathBuf = base
                .join(&project.folder)
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect();
            project.folder = if joined.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                joined
            };
        }
        project.project_file = path.to_path_buf();
        Ok(project)
    }

    pub fn write(&self) -> Result<(), ProjectError> {
        let stored = Project {
            folder: self.stored_folder(),
            ..self.clone()
        };
        let content = serde_json::to_string_pretty(&stored)?;
        if let Some(parent) = self.project_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.project_file, content)?;
        Ok(())
    }

    /// 新建项目：确保目录存在并在其中写入 `<name>.qproj`
    pub fn create(
        folder: &Path,
        name: &str,
        build_command: Option<String>,
    ) -> Result<Self, ProjectError> {
        let name = name.trim();
        if !is_plain_file_name(name) {
            return Err(ProjectError::InvalidName(name.to_string()));
        }

        std::fs::create_dir_all(folder)?;
        let project = Project {
            name: name.to_string(),
            folder: folder.to_path_buf(),
            build_command: build_command.filter(|cmd| !cmd.trim().is_empty()),
            project_file: folder.join(format!("{}.{}", name, PROJECT_EXTENSION)),
        };
        project.write()?;
        Ok(project)
    }

    /// 写入文件的 `folder`：在描述文件目录之下时存相对路径，读回时按同一目录解析
    fn stored_folder(&self) -> PathBuf {
        let base = self.project_file.parent().unwrap_or_else(|| Path::new(""));
        match self.folder.strip_prefix(base) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => self.folder.clone(),
        }
    }

    pub fn is_project_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
    }
}

/// 单个路径分量：非空、不含分隔符、不是 `.`/`..`
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
#[path = "../../tests/unit/models/project.rs"]
mod tests;
