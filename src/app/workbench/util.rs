use ratatui::layout::Rect;

pub(super) fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

/// 居中的弹窗区域，宽度按百分比、高度按行数
pub(super) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (area.width.saturating_mul(percent_x) / 100)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// 保证 `pos` 落在 `[offset, offset + len)` 里
pub(super) fn scroll_to_fit(offset: usize, pos: usize, len: usize) -> usize {
    if len == 0 {
        return pos;
    }
    if pos < offset {
        pos
    } else if pos >= offset + len {
        pos + 1 - len
    } else {
        offset
    }
}
