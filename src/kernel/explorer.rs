//! 项目浏览器：已打开项目列表 + 项目树 + 文件系统操作
//!
//! 所有磁盘访问都走 `FileProvider`；失败以 `ExplorerError` 返回，由 Store 转成消息框。

use crate::kernel::services::ports::file::{FileError, FileProvider};
use crate::models::project::{is_plain_file_name, Project, ProjectError};
use crate::models::project_tree::{NodeId, NodeKind, NodeTag, ProjectTree, TreeError};
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExplorerError {
    File(FileError),
    Project(ProjectError),
    Tree(TreeError),
    /// 描述文件或导入源不存在
    MissingPath(PathBuf),
    /// 项目目录不存在（根节点仍会加入树）
    MissingFolder(PathBuf),
    InvalidName(String),
    InvalidNode,
    Unsupported(&'static str),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorerError::File(e) => write!(f, "{}", e),
            ExplorerError::Project(e) => write!(f, "{}", e),
            ExplorerError::Tree(e) => write!(f, "{}", e),
            ExplorerError::MissingPath(p) => write!(f, "Path does not exist: {}", p.display()),
            ExplorerError::MissingFolder(p) => {
                write!(f, "Project folder does not exist: {}", p.display())
            }
            ExplorerError::InvalidName(name) => write!(f, "Invalid name: {:?}", name),
            ExplorerError::InvalidNode => write!(f, "Node no longer exists"),
            ExplorerError::Unsupported(what) => write!(f, "Not supported: {}", what),
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExplorerError::File(e) => Some(e),
            ExplorerError::Project(e) => Some(e),
            ExplorerError::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FileError> for ExplorerError {
    fn from(e: FileError) -> Self {
        ExplorerError::File(e)
    }
}

impl From<ProjectError> for ExplorerError {
    fn from(e: ProjectError) -> Self {
        ExplorerError::Project(e)
    }
}

impl From<TreeError> for ExplorerError {
    fn from(e: TreeError) -> Self {
        match e {
            TreeError::InvalidNodeId => ExplorerError::InvalidNode,
            other => ExplorerError::Tree(other),
        }
    }
}

impl From<std::io::Error> for ExplorerError {
    fn from(e: std::io::Error) -> Self {
        ExplorerError::File(FileError::Io(e))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Debug)]
pub struct ProjectOpened {
    pub root: NodeId,
    /// 扫描目录失败时的错误；根节点已经加入树
    pub scan_error: Option<ExplorerError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub command: String,
    pub cwd: PathBuf,
}

/// 不进入项目树的系统 / 版本控制噪音
pub fn should_ignore(name: &str) -> bool {
    matches!(
        name,
        ".DS_Store"
            | ".Spotlight-V100"
            | ".Trashes"
            | ".fseventsd"
            | ".TemporaryItems"
            | "Thumbs.db"
            | "desktop.ini"
            | ".git"
            | ".hg"
            | ".svn"
    )
}

/// 逐文件递归复制，按需创建目录；链接回已访问目录时跳过，失败不回滚
pub fn copy_directory(fs: &dyn FileProvider, src: &Path, dst: &Path) -> Result<()> {
    if !fs.is_dir(src) {
        return Err(ExplorerError::MissingPath(src.to_path_buf()));
    }

    let mut visited = FxHashSet::default();
    let mut stack = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from_dir, to_dir)) = stack.pop() {
        if !first_visit(fs, &mut visited, &from_dir) {
            tracing::warn!(path = %from_dir.display(), "skip directory cycle");
            continue;
        }
        fs.create_dir_all(&to_dir)?;
        for entry in fs.read_dir(&from_dir)? {
            let target = to_dir.join(&entry.name);
            if entry.is_dir {
                stack.push((entry.path, target));
            } else {
                fs.copy(&entry.path, &target)?;
            }
        }
    }
    Ok(())
}

/// 按真实路径判重；无法解析的路径视为首次访问
fn first_visit(fs: &dyn FileProvider, visited: &mut FxHashSet<PathBuf>, dir: &Path) -> bool {
    match fs.canonicalize(dir) {
        Ok(real) => visited.insert(real),
        Err(_) => true,
    }
}

pub struct ProjectExplorer {
    fs: Box<dyn FileProvider>,
    tree: ProjectTree,
    projects: Vec<Project>,
}

impl ProjectExplorer {
    pub fn new(fs: Box<dyn FileProvider>) -> Self {
        Self {
            fs,
            tree: ProjectTree::new(),
            projects: Vec::new(),
        }
    }

    pub fn fs(&self) -> &dyn FileProvider {
        self.fs.as_ref()
    }

    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ProjectTree {
        &mut self.tree
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    // ==================== 打开 / 刷新 ====================

    pub fn open_project_file(&mut self, path: &Path) -> Result<ProjectOpened> {
        if !self.fs.is_file(path) {
            return Err(ExplorerError::MissingPath(path.to_path_buf()));
        }
        if let Some(root) = self.tree.find_project_root(path) {
            return Ok(ProjectOpened {
                root,
                scan_error: None,
            });
        }

        let data = self.fs.read_file(path)?;
        let project = Project::from_descriptor(path, &data)?;
        Ok(self.open_project(project))
    }

    pub fn open_project(&mut self, project: Project) -> ProjectOpened {
        tracing::info!(
            project = %project.name,
            folder = %project.folder.display(),
            "open project"
        );
        match self
            .projects
            .iter_mut()
            .find(|p| p.project_file == project.project_file)
        {
            Some(existing) => *existing = project.clone(),
            None => self.projects.push(project.clone()),
        }
        if let Some(old_root) = self.tree.find_project_root(&project.project_file) {
            let _ = self.tree.remove(old_root);
        }
        self.add_root(project)
    }

    fn add_root(&mut self, project: Project) -> ProjectOpened {
        let folder = project.folder.clone();
        let root = self.tree.add_project(project);
        let scan_error = if self.fs.is_dir(&folder) {
            self.mirror(root, &folder).err()
        } else {
            Some(ExplorerError::MissingFolder(folder))
        };
        ProjectOpened { root, scan_error }
    }

    /// 把 `dir` 的内容镜像到 `parent` 之下（显式栈，目录在前）
    fn mirror(&mut self, parent: NodeId, dir: &Path) -> Result<()> {
        let mut stack = vec![(parent, dir.to_path_buf())];
        let mut visited = FxHashSet::default();
        let mut first = true;

        while let Some((node, path)) = stack.pop() {
            // 指回祖先的符号链接只保留节点，不再展开
            if !first_visit(self.fs.as_ref(), &mut visited, &path) {
                tracing::warn!(path = %path.display(), "skip directory cycle");
                continue;
            }
            let entries = match self.fs.read_dir(&path) {
                Ok(entries) => entries,
                Err(e) if first => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skip unreadable folder");
                    continue;
                }
            };
            first = false;

            for entry in entries {
                if should_ignore(&entry.name)
                    || (!entry.is_dir && Project::is_project_file(&entry.path))
                {
                    continue;
                }
                let kind = if entry.is_dir {
                    NodeKind::Folder
                } else {
                    NodeKind::File
                };
                let child =
                    self.tree
                        .insert_child(node, kind, entry.name.clone(), entry.path.clone())?;
                if entry.is_dir {
                    stack.push((child, entry.path));
                }
            }
        }
        Ok(())
    }

    /// 整棵树拆掉重建；展开 / 选中状态按路径恢复
    pub fn refresh_projects(&mut self) -> Result<()> {
        let expanded = self.tree.expanded_paths();
        let selected = self
            .tree
            .selected()
            .and_then(|id| self.tree.path(id))
            .map(Path::to_path_buf);
        let collapsed_roots: Vec<PathBuf> = self
            .tree
            .roots()
            .iter()
            .filter(|&&id| !self.tree.is_expanded(id))
            .filter_map(|&id| self.tree.path(id).map(Path::to_path_buf))
            .collect();

        self.tree.clear();

        let mut first_error = None;
        let projects = std::mem::take(&mut self.projects);
        for mut project in projects {
            match self.fs.read_file(&project.project_file) {
                Ok(data) => match Project::from_descriptor(&project.project_file, &data) {
                    Ok(fresh) => project = fresh,
                    Err(e) => tracing::warn!(
                        path = %project.project_file.display(),
                        error = %e,
                        "keep in-memory project"
                    ),
                },
                Err(e) => tracing::warn!(
                    path = %project.project_file.display(),
                    error = %e,
                    "keep in-memory project"
                ),
            }

            self.projects.push(project.clone());
            let opened = self.add_root(project);
            if let Some(e) = opened.scan_error {
                tracing::warn!(error = %e, "project scan failed during refresh");
                first_error.get_or_insert(e);
            }
        }

        for path in &expanded {
            if let Some(id) = self.tree.find_by_path(path) {
                self.tree.expand(id);
            }
        }
        for path in &collapsed_roots {
            if let Some(id) = self.tree.find_by_path(path) {
                self.tree.collapse(id);
            }
        }
        let selected = selected.and_then(|path| self.tree.find_by_path(&path));
        self.tree.set_selected(selected);

        tracing::info!(projects = self.projects.len(), "projects refreshed");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ==================== 节点操作 ====================

    pub fn add_new_folder(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        let path = self.child_path(parent, name)?;
        self.fs.create_dir(&path)?;
        self.insert_created(parent, NodeKind::Folder, name, path)
    }

    pub fn add_new_file(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        let path = self.child_path(parent, name)?;
        if self.fs.exists(&path) {
            return Err(FileError::AlreadyExists(path).into());
        }
        self.fs.write_file(&path, "")?;
        self.insert_created(parent, NodeKind::File, name, path)
    }

    fn child_path(&self, parent: NodeId, name: &str) -> Result<PathBuf> {
        let dir = self.tree.path(parent).ok_or(ExplorerError::InvalidNode)?;
        if !self.tree.is_container(parent) {
            return Err(TreeError::ParentNotContainer.into());
        }
        if !is_plain_file_name(name) {
            return Err(ExplorerError::InvalidName(name.to_string()));
        }
        Ok(dir.join(name))
    }

    fn insert_created(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: &str,
        path: PathBuf,
    ) -> Result<NodeId> {
        let id = self
            .tree
            .insert_child(parent, kind, name.to_string(), path)?;
        self.tree.expand(parent);
        self.tree.set_selected(Some(id));
        Ok(id)
    }

    /// 以磁盘上的实际类型决定删文件还是删目录
    pub fn delete_node(&mut self, id: NodeId) -> Result<()> {
        match self.tree.tag(id).ok_or(ExplorerError::InvalidNode)? {
            NodeTag::Project => return Err(ExplorerError::Unsupported("delete a project node")),
            NodeTag::Folder | NodeTag::File => {}
        }
        let path = self
            .tree
            .path(id)
            .ok_or(ExplorerError::InvalidNode)?
            .to_path_buf();

        let meta = self.fs.metadata(&path)?;
        if meta.is_dir {
            self.fs.delete_dir_all(&path)?;
        } else {
            self.fs.delete_file(&path)?;
        }
        self.tree.remove(id)?;
        Ok(())
    }

    /// 返回新路径。重命名目录后子节点路径保持旧值，直到刷新
    pub fn rename_node(&mut self, id: NodeId, new_name: &str) -> Result<PathBuf> {
        if self.tree.tag(id).ok_or(ExplorerError::InvalidNode)? == NodeTag::Project {
            return Err(ExplorerError::Unsupported("rename a project node"));
        }
        let new_name = new_name.trim();
        if !is_plain_file_name(new_name) {
            return Err(ExplorerError::InvalidName(new_name.to_string()));
        }

        let old_path = self
            .tree
            .path(id)
            .ok_or(ExplorerError::InvalidNode)?
            .to_path_buf();
        let new_path = match old_path.parent() {
            Some(dir) => dir.join(new_name),
            None => PathBuf::from(new_name),
        };
        if new_path == old_path {
            return Ok(new_path);
        }

        self.fs.rename(&old_path, &new_path)?;
        self.tree
            .relabel(id, new_name.to_string(), new_path.clone())?;
        Ok(new_path)
    }

    pub fn copy_directory(&self, src: &Path, dst: &Path) -> Result<()> {
        copy_directory(self.fs.as_ref(), src, dst)
    }

    pub fn import_file(&mut self, parent: NodeId, source: &Path) -> Result<NodeId> {
        if !self.fs.is_file(source) {
            return Err(ExplorerError::MissingPath(source.to_path_buf()));
        }
        let name = file_name_of(source)?;
        let target = self.child_path(parent, &name)?;
        self.fs.copy(source, &target)?;
        self.insert_created(parent, NodeKind::File, &name, target)
    }

    pub fn import_folder(&mut self, parent: NodeId, source: &Path) -> Result<NodeId> {
        if !self.fs.is_dir(source) {
            return Err(ExplorerError::MissingPath(source.to_path_buf()));
        }
        let name = file_name_of(source)?;
        let target = self.child_path(parent, &name)?;
        if self.fs.exists(&target) {
            return Err(FileError::AlreadyExists(target).into());
        }

        self.copy_directory(source, &target)?;
        let id = self.insert_created(parent, NodeKind::Folder, &name, target.clone())?;
        self.mirror(id, &target)?;
        Ok(id)
    }

    /// `name.ext` → `name-Copy.ext`（已存在则 `name-Copy2.ext` …）
    pub fn duplicate_file(&mut self, id: NodeId) -> Result<NodeId> {
        if self.tree.tag(id).ok_or(ExplorerError::InvalidNode)? != NodeTag::File {
            return Err(ExplorerError::Unsupported("duplicate a folder"));
        }
        let parent = self.tree.parent(id).ok_or(ExplorerError::InvalidNode)?;
        let source = self
            .tree
            .path(id)
            .ok_or(ExplorerError::InvalidNode)?
            .to_path_buf();
        let dir = source.parent().unwrap_or_else(|| Path::new(""));

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut n = 1usize;
        let name = loop {
            let suffix = if n == 1 { String::new() } else { n.to_string() };
            let candidate = format!("{}-Copy{}{}", stem, suffix, ext);
            if !self.fs.exists(&dir.join(&candidate)) {
                break candidate;
            }
            n += 1;
        };

        let target = dir.join(&name);
        self.fs.copy(&source, &target)?;
        self.insert_created(parent, NodeKind::File, &name, target)
    }

    // ==================== 项目级操作 ====================

    fn owning_project(&self, id: NodeId) -> Result<(NodeId, Project)> {
        let root = self.tree.root_of(id).ok_or(ExplorerError::InvalidNode)?;
        let project = self
            .tree
            .project_of(root)
            .ok_or(ExplorerError::InvalidNode)?
            .clone();
        Ok((root, project))
    }

    /// 从列表移除并刷新；返回描述文件路径
    pub fn close_project(&mut self, id: NodeId) -> Result<PathBuf> {
        let (_, project) = self.owning_project(id)?;
        self.projects
            .retain(|p| p.project_file != project.project_file);
        tracing::info!(project = %project.name, "close project");
        self.refresh_projects()?;
        Ok(project.project_file)
    }

    /// 只移出树和列表，不动磁盘
    pub fn remove_project(&mut self, id: NodeId) -> Result<PathBuf> {
        let (root, project) = self.owning_project(id)?;
        self.tree.remove(root)?;
        self.projects
            .retain(|p| p.project_file != project.project_file);
        tracing::info!(project = %project.name, "remove project");
        Ok(project.project_file)
    }

    /// 递归删除项目目录和描述文件
    pub fn delete_project(&mut self, id: NodeId) -> Result<PathBuf> {
        let (root, project) = self.owning_project(id)?;

        if self.fs.is_dir(&project.folder) {
            self.fs.delete_dir_all(&project.folder)?;
        }
        if self.fs.exists(&project.project_file) {
            self.fs.delete_file(&project.project_file)?;
        }

        self.tree.remove(root)?;
        self.projects
            .retain(|p| p.project_file != project.project_file);
        tracing::info!(project = %project.name, "delete project");
        Ok(project.project_file)
    }

    /// 文件返回要打开的路径；目录 / 项目切换展开
    pub fn activate(&mut self, id: NodeId) -> Result<Option<PathBuf>> {
        match self.tree.tag(id).ok_or(ExplorerError::InvalidNode)? {
            NodeTag::File => Ok(self.tree.path(id).map(Path::to_path_buf)),
            NodeTag::Folder | NodeTag::Project => {
                self.tree.toggle_expand(id);
                Ok(None)
            }
        }
    }

    pub fn build_command(&self, id: NodeId) -> Result<Option<BuildRequest>> {
        let (_, project) = self.owning_project(id)?;
        Ok(project.build_command.map(|command| BuildRequest {
            command,
            cwd: project.folder,
        }))
    }

    /// 新建 / 导入的目标容器：文件节点取其父节点
    pub fn container_of(&self, id: NodeId) -> Option<NodeId> {
        if self.tree.is_container(id) {
            Some(id)
        } else {
            self.tree.parent(id)
        }
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ExplorerError::InvalidName(path.display().to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/explorer.rs"]
mod tests;
