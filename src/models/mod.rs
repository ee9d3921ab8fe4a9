//! 数据模型层

pub mod project;
pub mod project_tree;
pub mod recent_projects;
pub mod text_buffer;

pub use project::{Project, ProjectError, PROJECT_EXTENSION};
pub use project_tree::{Icon, IconPair, NodeId, NodeKind, NodeTag, ProjectTree, TreeError, TreeRow};
pub use recent_projects::RecentProjects;
pub use text_buffer::{slice_to_cow, LineRange, TextBuffer};
