//! 工作台模块：统一管理渲染、输入分发和副作用执行

use super::theme::UiTheme;
use crate::core::event::InputEvent;
use crate::kernel::services::adapters::KeybindingService;
use crate::kernel::{Action as KernelAction, DocumentId, Store};
use ratatui::layout::Rect;
use ratatui::Frame;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

mod bridge;
mod input;
mod render;
mod tick;
mod util;

const HEADER_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;
const SIDEBAR_WIDTH_PERCENT: u16 = 25;
const SIDEBAR_MIN_WIDTH: u16 = 20;
const MAX_LOG_DRAIN_PER_TICK: usize = 256;
/// 没有待处理高亮时的轮询间隔
const IDLE_POLL: Duration = Duration::from_millis(250);

/// 上一帧的布局，鼠标点击按它换算
#[derive(Debug, Default, Clone)]
struct LayoutCache {
    sidebar: Option<Rect>,
    tabs: Option<Rect>,
    /// 每个标签页在标签栏里的 `[start, end)` 列
    tab_spans: Vec<(u16, u16)>,
    editor: Option<Rect>,
    cursor: Option<(u16, u16)>,
}

pub struct Workbench {
    store: Store,
    keybindings: KeybindingService,
    theme: UiTheme,
    log_rx: Option<Receiver<String>>,
    last_log: Option<String>,
    /// 编辑区左上角对应的 (行, 显示列)
    scroll: (usize, usize),
    tree_scroll: usize,
    /// 光标没动时不跟随，鼠标滚动才不会被拉回
    last_cursor: Option<(DocumentId, (usize, usize))>,
    layout: LayoutCache,
}

impl Workbench {
    pub fn new(
        store: Store,
        keybindings: KeybindingService,
        theme: UiTheme,
        log_rx: Option<Receiver<String>>,
    ) -> Self {
        Self {
            store,
            keybindings,
            theme,
            log_rx,
            last_log: None,
            scroll: (0, 0),
            tree_scroll: 0,
            last_cursor: None,
            layout: LayoutCache::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.store.state().ui.should_quit
    }

    pub fn last_log(&self) -> Option<&str> {
        self.last_log.as_deref()
    }

    /// 对外入口：派发一个动作并执行它产生的副作用
    pub fn dispatch(&mut self, action: KernelAction) -> bool {
        self.dispatch_kernel(action)
    }

    /// 主循环 poll 的超时：最近的高亮截止时间，没有就用空闲间隔
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.store
            .state()
            .documents
            .iter()
            .filter_map(|doc| doc.highlight_deadline())
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL)
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        input::handle_input(self, event)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        render::render(self, frame, area);
    }

    /// 上一帧算出的终端光标位置
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        self.layout.cursor
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
