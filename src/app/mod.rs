//! 应用层：终端工作台和主题

pub mod theme;
pub mod workbench;

pub use theme::UiTheme;
pub use workbench::Workbench;
