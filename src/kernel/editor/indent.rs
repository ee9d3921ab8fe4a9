//! 花括号自动缩进
//!
//! 每行算出两个量：`shift`（本行相对上一稳定缩进的偏移）和 `shift_next_lines`
//! （对后续行的偏移）。某行需要的缩进 = 向上最近的稳定行（非空且 shift == 0）的行首缩进
//! + 稳定行到上一行之间各行 `shift_next_lines` 之和 + 本行 `shift`。不做括号配对。

use crate::models::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineShift {
    pub shift: isize,
    pub shift_next_lines: isize,
}

pub fn line_shift(line: &str, tab_size: usize, comment_prefix: &str) -> LineShift {
    let trimmed = line.trim();
    let tab = tab_size as isize;
    if trimmed.is_empty() || (!comment_prefix.is_empty() && trimmed.starts_with(comment_prefix)) {
        return LineShift::default();
    }

    if trimmed.ends_with('{') {
        LineShift {
            shift: 0,
            shift_next_lines: tab,
        }
    } else if trimmed.ends_with('}') {
        LineShift {
            shift: -tab,
            shift_next_lines: -tab,
        }
    } else {
        LineShift::default()
    }
}

pub fn needed_indent(
    buffer: &TextBuffer,
    row: usize,
    tab_size: usize,
    comment_prefix: &str,
) -> usize {
    if row >= buffer.len_lines() {
        return 0;
    }

    let mut pending = Vec::new();
    let mut stable = 0;
    for i in (0..row).rev() {
        let text = buffer.line(i).unwrap_or_default();
        let shift = line_shift(&text, tab_size, comment_prefix);
        pending.push(shift);
        stable = i;
        if shift.shift == 0 && !text.trim().is_empty() {
            break;
        }
    }

    let mut indent = if row == 0 {
        0
    } else {
        buffer.leading_indent(stable, tab_size) as isize
    };
    while let Some(shift) = pending.pop() {
        indent += shift.shift_next_lines;
    }

    let current = buffer.line(row).unwrap_or_default();
    let needed = indent + line_shift(&current, tab_size, comment_prefix).shift;
    needed.max(0) as usize
}

/// 把 `row` 的缩进调整为计算值；返回是否改动了文本
pub fn reindent_line(
    buffer: &mut TextBuffer,
    row: usize,
    tab_size: usize,
    comment_prefix: &str,
) -> bool {
    let needed = needed_indent(buffer, row, tab_size, comment_prefix);
    buffer.set_line_indent(row, needed)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/indent.rs"]
mod tests;
