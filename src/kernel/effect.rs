use std::path::PathBuf;

use crate::kernel::explorer::BuildRequest;

/// 内核之外要做的事，由 workbench 执行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// 启动构建命令，不等待结束
    RunBuild(BuildRequest),
    RunScript(PathBuf),
}
