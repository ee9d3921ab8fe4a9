//! quire - 带项目管理器的终端代码编辑器
//!
//! 模块结构：
//! - core: 命令与输入事件
//! - models: 数据模型（Project, ProjectTree, TextBuffer, RecentProjects）
//! - kernel: 无界面核心（Store, Document, ProjectExplorer, ScriptHost, 配置适配）
//! - app: 应用层（Workbench, UiTheme）
//! - tui: 终端模式的进入与恢复

pub mod app;
pub mod core;
pub mod kernel;
pub mod models;
pub mod tui;
