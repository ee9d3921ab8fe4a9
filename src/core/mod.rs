//! 核心抽象：输入事件与语义命令

pub mod command;
pub mod event;

pub use command::Command;
pub use event::{text_char, InputEvent, Key};
