//! 项目树数据模型
//!
//! 节点自带绝对路径（而不是由父节点拼出来），所以重命名目录后子节点路径会过期，
//! 直到整棵树刷新重建。

use super::project::Project;
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::path::{Path, PathBuf};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Project(Project),
    Folder,
    File,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Project,
    Folder,
    File,
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Project(_) => NodeTag::Project,
            NodeKind::Folder => NodeTag::Folder,
            NodeKind::File => NodeTag::File,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::File)
    }

    pub fn icons(&self) -> IconPair {
        let icon = match self {
            NodeKind::Project(_) => Icon::Project,
            NodeKind::Folder => Icon::Folder,
            NodeKind::File => Icon::File,
        };
        IconPair {
            image: icon,
            selected: icon,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Icon {
    Folder,
    File,
    Project,
}

/// 普通 / 选中两种状态下显示的图标
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IconPair {
    pub image: Icon,
    pub selected: Icon,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TreeError {
    InvalidNodeId,
    ParentNotContainer,
    NameExists,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidNodeId => write!(f, "invalid node id"),
            TreeError::ParentNotContainer => write!(f, "parent is not a folder or project"),
            TreeError::NameExists => write!(f, "name already exists in parent"),
        }
    }
}

impl std::error::Error for TreeError {}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    text: String,
    path: PathBuf,
    icons: IconPair,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Default)]
pub struct ProjectTree {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    expanded: FxHashSet<NodeId>,
    selected: Option<NodeId>,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn add_project(&mut self, project: Project) -> NodeId {
        let text = project.name.clone();
        let path = project.folder.clone();
        let kind = NodeKind::Project(project);
        let id = self.arena.insert(Node {
            icons: kind.icons(),
            kind,
            text,
            path,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        self.expanded.insert(id);
        id
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        text: String,
        path: PathBuf,
    ) -> Result<NodeId, TreeError> {
        {
            let parent_ro = self.arena.get(parent).ok_or(TreeError::InvalidNodeId)?;
            if !parent_ro.kind.is_container() {
                return Err(TreeError::ParentNotContainer);
            }
            let exists = parent_ro
                .children
                .iter()
                .filter_map(|&c| self.arena.get(c))
                .any(|c| c.text == text);
            if exists {
                return Err(TreeError::NameExists);
            }
        }

        let id = self.arena.insert(Node {
            icons: kind.icons(),
            kind,
            text,
            path,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.arena
            .get_mut(parent)
            .ok_or(TreeError::InvalidNodeId)?
            .children
            .push(id);
        Ok(id)
    }

    /// 删除节点及其整棵子树
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.arena.get(id).ok_or(TreeError::InvalidNodeId)?.parent;

        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.arena.get_mut(parent_id) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        let mut selection_removed = false;
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.arena.remove(node_id) {
                stack.extend(node.children);
            }
            self.expanded.remove(&node_id);
            selection_removed |= self.selected == Some(node_id);
        }

        if selection_removed {
            self.selected = parent;
        }
        Ok(())
    }

    /// 只更新该节点自身的显示名和路径，子节点保持原样
    pub fn relabel(&mut self, id: NodeId, text: String, path: PathBuf) -> Result<(), TreeError> {
        let node = self.arena.get_mut(id).ok_or(TreeError::InvalidNodeId)?;
        node.text = text;
        node.path = path;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.roots.clear();
        self.expanded.clear();
        self.selected = None;
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.arena.get(id).map(|n| &n.kind)
    }

    pub fn tag(&self, id: NodeId) -> Option<NodeTag> {
        self.kind(id).map(NodeKind::tag)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.text.as_str())
    }

    pub fn path(&self, id: NodeId) -> Option<&Path> {
        self.arena.get(id).map(|n| n.path.as_path())
    }

    pub fn icons(&self, id: NodeId) -> Option<IconPair> {
        self.arena.get(id).map(|n| n.icons)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|n| n.kind.is_container())
    }

    pub fn root_of(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let node = self.arena.get(id)?;
            match node.parent {
                Some(parent) => id = parent,
                None => return Some(id),
            }
        }
    }

    /// 节点所属项目（沿父链找到根）
    pub fn project_of(&self, id: NodeId) -> Option<&Project> {
        match self.kind(self.root_of(id)?)? {
            NodeKind::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            if node.path == path {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn find_project_root(&self, project_file: &Path) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| {
            matches!(
                self.kind(id),
                Some(NodeKind::Project(p)) if p.project_file == project_file
            )
        })
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id.filter(|id| self.arena.contains_key(*id));
    }

    pub fn toggle_expand(&mut self, id: NodeId) {
        if self.is_container(id) && !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn expand(&mut self, id: NodeId) {
        if self.is_container(id) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded_paths(&self) -> Vec<PathBuf> {
        self.expanded
            .iter()
            .filter_map(|&id| self.arena.get(id).map(|n| n.path.clone()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub text: String,
    pub tag: NodeTag,
    pub icons: IconPair,
    pub is_expanded: bool,
}

impl ProjectTree {
    /// 按显示顺序展开成行（只包含已展开节点的子节点）
    pub fn flatten_for_view(&self) -> Vec<TreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_expanded = self.expanded.contains(&id);
            result.push(TreeRow {
                id,
                depth,
                text: node.text.clone(),
                tag: node.kind.tag(),
                icons: node.icons,
                is_expanded,
            });

            if is_expanded {
                for &child in node.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        result
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        let rows = self.flatten_for_view();
        if rows.is_empty() {
            return false;
        }
        let current = self
            .selected
            .and_then(|sel| rows.iter().position(|r| r.id == sel));
        let next = match current {
            Some(idx) => (idx as isize + delta).clamp(0, rows.len() as isize - 1) as usize,
            None => 0,
        };
        let next_id = rows[next].id;
        if self.selected == Some(next_id) {
            return false;
        }
        self.selected = Some(next_id);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/project_tree.rs"]
mod tests;
