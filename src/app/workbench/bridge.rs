use super::Workbench;
use crate::kernel::{Action as KernelAction, BuildRequest, Effect, ScriptHost};
use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::thread::JoinHandle;

impl Workbench {
    pub(super) fn dispatch_kernel(&mut self, action: KernelAction) -> bool {
        let result = self.store.dispatch(action);
        let mut state_changed = result.state_changed;
        for effect in result.effects {
            state_changed |= self.run_effect(effect);
        }
        state_changed
    }

    fn run_effect(&mut self, effect: Effect) -> bool {
        tracing::debug!(?effect, "run effect");
        match effect {
            Effect::RunBuild(request) => {
                // 等待线程自行结束，不需要 join
                if let Err(err) = spawn_build(&request) {
                    tracing::warn!(command = %request.command, error = %err, "build spawn failed");
                    return self.dispatch_kernel(KernelAction::ShowMessage(format!(
                        "Failed to start '{}': {err}",
                        request.command
                    )));
                }
                false
            }
            Effect::RunScript(path) => self.run_script(&path),
        }
    }

    /// 脚本失败只弹消息，不影响编辑器继续运行
    fn run_script(&mut self, path: &Path) -> bool {
        let host = ScriptHost::default();
        match host.run(path, &mut self.store) {
            Ok(()) => {
                tracing::info!(script = %path.display(), "script finished");
            }
            Err(err) => {
                tracing::warn!(script = %path.display(), error = %err, "script failed");
                self.dispatch_kernel(KernelAction::ShowMessage(format!(
                    "Script {}: {err}",
                    path.display()
                )));
            }
        }
        true
    }
}

/// 交给系统 shell 执行；输出丢弃以免弄乱终端，后台线程回收子进程并把退出状态写进日志（状态栏可见）
pub(super) fn spawn_build(
    request: &BuildRequest,
) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut command = if cfg!(windows) {
        let mut cmd = ProcessCommand::new("cmd");
        cmd.arg("/C").arg(&request.command);
        cmd
    } else {
        let mut cmd = ProcessCommand::new("sh");
        cmd.arg("-c").arg(&request.command);
        cmd
    };
    let mut child = command
        .current_dir(&request.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    tracing::info!(
        command = %request.command,
        cwd = %request.cwd.display(),
        pid,
        "build started"
    );

    let label = request.command.clone();
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) if status.success() => {
            tracing::info!(command = %label, pid, "build succeeded");
            Some(status)
        }
        Ok(status) => {
            tracing::warn!(command = %label, pid, %status, "build failed");
            Some(status)
        }
        Err(e) => {
            tracing::warn!(command = %label, pid, error = %e, "build wait failed");
            None
        }
    }))
}
