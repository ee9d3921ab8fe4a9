//! 文本缓冲区模型
//!
//! 职责：
//! - 文本存储（Rope）
//! - 光标（行, 字素列）
//! - 每次编辑返回受影响的行范围，供高亮防抖累积

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// 从 RopeSlice 获取字符串，优先零拷贝
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

/// 闭区间行范围（编辑后的行号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn union(self, other: LineRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    cursor: (usize, usize),
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: (0, 0),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// 超出范围时夹到最后一行 / 行尾
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.len_lines().saturating_sub(1));
        let col = col.min(self.line_grapheme_len(row));
        self.cursor = (row, col);
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// 行内容（不含换行符）
    pub fn line(&self, row: usize) -> Option<String> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(row);
        let line = slice_to_cow(slice);
        Some(strip_line_ending(&line).to_string())
    }

    pub fn pos_to_char(&self, pos: (usize, usize)) -> usize {
        self.rope.line_to_char(pos.0) + self.grapheme_to_char_index(pos.0, pos.1)
    }

    pub fn grapheme_to_char_index(&self, row: usize, grapheme_index: usize) -> usize {
        let slice = self.rope.line(row);
        let line = slice_to_cow(slice);
        strip_line_ending(&line)
            .graphemes(true)
            .take(grapheme_index)
            .map(|g| g.chars().count())
            .sum()
    }

    pub fn line_grapheme_len(&self, row: usize) -> usize {
        if row >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(row);
        let line = slice_to_cow(slice);
        strip_line_ending(&line).graphemes(true).count()
    }

    /// 行首空白宽度（tab 按 `tab_size` 计）
    pub fn leading_indent(&self, row: usize, tab_size: usize) -> usize {
        let Some(line) = self.line(row) else {
            return 0;
        };
        line.chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .map(|c| if c == '\t' { tab_size.max(1) } else { 1 })
            .sum()
    }

    // ==================== 编辑 ====================

    pub fn insert_str(&mut self, s: &str) -> LineRange {
        let (row, col) = self.cursor;
        let char_offset = self.pos_to_char(self.cursor);
        self.rope.insert(char_offset, s);

        let newlines = s.matches('\n').count();
        self.cursor = match s.rfind('\n') {
            Some(idx) => (row + newlines, s[idx + 1..].graphemes(true).count()),
            None => (row, col + s.graphemes(true).count()),
        };

        LineRange {
            start: row,
            end: row + newlines,
        }
    }

    pub fn insert_char(&mut self, c: char) -> LineRange {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    /// Backspace
    pub fn delete_backward(&mut self) -> Option<LineRange> {
        let (row, col) = self.cursor;
        if col > 0 {
            let start = self.pos_to_char((row, col - 1));
            let end = self.pos_to_char((row, col));
            self.rope.remove(start..end);
            self.cursor = (row, col - 1);
            Some(LineRange::single(row))
        } else if row > 0 {
            let prev_len = self.line_grapheme_len(row - 1);
            let end = self.rope.line_to_char(row);
            let start = self.rope.line_to_char(row - 1) + self.grapheme_to_char_index(row - 1, prev_len);
            self.rope.remove(start..end);
            self.cursor = (row - 1, prev_len);
            Some(LineRange::single(row - 1))
        } else {
            None
        }
    }

    /// Delete
    pub fn delete_forward(&mut self) -> Option<LineRange> {
        let (row, col) = self.cursor;
        let line_len = self.line_grapheme_len(row);

        if col < line_len {
            let start = self.pos_to_char((row, col));
            let end = self.pos_to_char((row, col + 1));
            self.rope.remove(start..end);
            Some(LineRange::single(row))
        } else if row + 1 < self.len_lines() {
            let start = self.pos_to_char((row, col));
            let end = self.rope.line_to_char(row + 1);
            self.rope.remove(start..end);
            Some(LineRange::single(row))
        } else {
            None
        }
    }

    /// 把行首空白替换成 `width` 个空格；光标在该行时随之平移
    pub fn set_line_indent(&mut self, row: usize, width: usize) -> bool {
        let Some(line) = self.line(row) else {
            return false;
        };
        let old_ws = line
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count();
        if old_ws == width && !line[..old_ws].contains('\t') {
            return false;
        }

        let line_start = self.rope.line_to_char(row);
        self.rope.remove(line_start..line_start + old_ws);
        self.rope.insert(line_start, &" ".repeat(width));

        if self.cursor.0 == row {
            let col = self.cursor.1;
            self.cursor.1 = if col >= old_ws {
                col - old_ws + width
            } else {
                width
            };
        }
        true
    }

    // ==================== 光标移动 ====================

    pub fn move_left(&mut self) -> bool {
        let (row, col) = self.cursor;
        if col > 0 {
            self.cursor = (row, col - 1);
        } else if row > 0 {
            self.cursor = (row - 1, self.line_grapheme_len(row - 1));
        } else {
            return false;
        }
        true
    }

    pub fn move_right(&mut self) -> bool {
        let (row, col) = self.cursor;
        if col < self.line_grapheme_len(row) {
            self.cursor = (row, col + 1);
        } else if row + 1 < self.len_lines() {
            self.cursor = (row + 1, 0);
        } else {
            return false;
        }
        true
    }

    pub fn move_up(&mut self) -> bool {
        let (row, col) = self.cursor;
        if row == 0 {
            return false;
        }
        self.set_cursor(row - 1, col);
        true
    }

    pub fn move_down(&mut self) -> bool {
        let (row, col) = self.cursor;
        if row + 1 >= self.len_lines() {
            return false;
        }
        self.set_cursor(row + 1, col);
        true
    }

    pub fn move_line_start(&mut self) -> bool {
        let prev = self.cursor;
        self.cursor.1 = 0;
        prev != self.cursor
    }

    pub fn move_line_end(&mut self) -> bool {
        let prev = self.cursor;
        self.cursor.1 = self.line_grapheme_len(self.cursor.0);
        prev != self.cursor
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
