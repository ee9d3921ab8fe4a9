use super::Workbench;
use crate::kernel::Action as KernelAction;
use std::sync::mpsc;
use std::time::Instant;

impl Workbench {
    /// 主循环每轮调用：拉取日志、推进高亮防抖
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.poll_logs();
        changed |= self.dispatch_kernel(KernelAction::Tick { now });
        changed
    }

    fn poll_logs(&mut self) -> bool {
        let Some(rx) = self.log_rx.take() else {
            return false;
        };

        let mut changed = false;
        let mut drained = 0usize;
        let mut disconnected = false;

        loop {
            match rx.try_recv() {
                Ok(line) => {
                    changed = true;
                    drained += 1;
                    self.last_log = Some(line);
                    if drained >= super::MAX_LOG_DRAIN_PER_TICK {
                        break;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if !disconnected {
            self.log_rx = Some(rx);
        }
        changed
    }
}
