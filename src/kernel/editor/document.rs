//! 单个打开的文档：文本、脏标记、语言、防抖高亮

use super::indent::{line_shift, needed_indent, reindent_line};
use super::syntax::{HighlightSpan, SyntaxDocument};
use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::file::{FileError, FileProvider};
use crate::kernel::services::ports::settings::EditorSettings;
use crate::models::{LineRange, TextBuffer};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub type DocumentId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingHighlight {
    range: LineRange,
    since: Instant,
}

pub struct Document {
    id: DocumentId,
    path: Option<PathBuf>,
    title: String,
    buffer: TextBuffer,
    is_changed: bool,
    default_language: Option<LanguageId>,
    syntax_override: Option<LanguageId>,
    syntax: Option<SyntaxDocument>,
    highlights: Vec<Vec<HighlightSpan>>,
    pending: Option<PendingHighlight>,
    tab_size: usize,
    auto_indent: bool,
    highlight_delay: Duration,
}

impl Document {
    pub fn untitled(id: DocumentId, title: String, settings: &EditorSettings) -> Self {
        Self::with_text(id, None, title, "", settings)
    }

    pub fn open(
        id: DocumentId,
        path: &Path,
        fs: &dyn FileProvider,
        settings: &EditorSettings,
    ) -> Result<Self, FileError> {
        let text = fs.read_file(path)?;
        Ok(Self::with_text(
            id,
            Some(path.to_path_buf()),
            title_for(path),
            &text,
            settings,
        ))
    }

    fn with_text(
        id: DocumentId,
        path: Option<PathBuf>,
        title: String,
        text: &str,
        settings: &EditorSettings,
    ) -> Self {
        let mut doc = Self {
            id,
            default_language: path.as_deref().and_then(LanguageId::from_path),
            path,
            title,
            buffer: TextBuffer::from_text(text),
            is_changed: false,
            syntax_override: None,
            syntax: None,
            highlights: Vec::new(),
            pending: None,
            tab_size: settings.tab_size.max(1),
            auto_indent: settings.auto_indent,
            highlight_delay: Duration::from_millis(settings.highlight_delay_ms),
        };
        doc.rebuild_syntax();
        doc
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 有未保存修改时追加 `*`
    pub fn window_title(&self) -> String {
        if self.is_changed {
            format!("{}*", self.title)
        } else {
            self.title.clone()
        }
    }

    pub fn is_changed(&self) -> bool {
        self.is_changed
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// 覆盖语言优先，其次是扩展名推断的默认语言
    pub fn language(&self) -> Option<LanguageId> {
        self.syntax_override.or(self.default_language)
    }

    pub fn syntax_override(&self) -> Option<LanguageId> {
        self.syntax_override
    }

    pub fn set_syntax_override(&mut self, language: Option<LanguageId>) {
        if self.syntax_override == language {
            return;
        }
        self.syntax_override = language;
        self.rebuild_syntax();
    }

    fn comment_prefix(&self) -> &'static str {
        self.language().map(LanguageId::comment_prefix).unwrap_or("")
    }

    fn rebuild_syntax(&mut self) {
        self.pending = None;
        self.syntax = self
            .language()
            .and_then(|lang| SyntaxDocument::new(lang, self.buffer.rope()));
        self.highlight_all();
    }

    fn highlight_all(&mut self) {
        self.highlights = match &self.syntax {
            Some(syntax) => {
                syntax.highlight_lines(self.buffer.rope(), 0, self.buffer.len_lines())
            }
            None => Vec::new(),
        };
    }

    pub fn highlight_line(&self, row: usize) -> &[HighlightSpan] {
        self.highlights.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    // ==================== 编辑 ====================

    fn mark_changed(&mut self, range: LineRange, now: Instant) {
        self.is_changed = true;
        let range = match self.pending {
            Some(pending) => pending.range.union(range),
            None => range,
        };
        self.pending = Some(PendingHighlight { range, since: now });
    }

    pub fn insert_char(&mut self, c: char, now: Instant) {
        if c == '\n' {
            self.insert_newline(now);
            return;
        }

        let row = self.buffer.cursor().0;
        let prefix = self.comment_prefix();
        let shift_of = |buffer: &TextBuffer, tab: usize| {
            line_shift(&buffer.line(row).unwrap_or_default(), tab, prefix)
        };
        let before = shift_of(&self.buffer, self.tab_size);

        let range = self.buffer.insert_char(c);
        self.mark_changed(range, now);

        let after = shift_of(&self.buffer, self.tab_size);
        if self.auto_indent
            && before != after
            && reindent_line(&mut self.buffer, row, self.tab_size, prefix)
        {
            self.mark_changed(LineRange::single(row), now);
        }
    }

    /// 换行后按上文计算新行缩进
    pub fn insert_newline(&mut self, now: Instant) {
        let range = self.buffer.insert_str("\n");
        self.mark_changed(range, now);
        if !self.auto_indent {
            return;
        }

        let row = self.buffer.cursor().0;
        let prefix = self.comment_prefix();
        let needed = needed_indent(&self.buffer, row, self.tab_size, prefix);
        if self.buffer.set_line_indent(row, needed) {
            self.mark_changed(LineRange::single(row), now);
        }
    }

    /// 空格补到下一个制表位
    pub fn insert_tab(&mut self, now: Instant) {
        let col = self.buffer.cursor().1;
        let width = self.tab_size - col % self.tab_size;
        let range = self.buffer.insert_str(&" ".repeat(width));
        self.mark_changed(range, now);
    }

    /// 粘贴等多字符插入，不触发自动缩进
    pub fn insert_str(&mut self, text: &str, now: Instant) {
        if text.is_empty() {
            return;
        }
        let range = self.buffer.insert_str(text);
        self.mark_changed(range, now);
    }

    pub fn delete_backward(&mut self, now: Instant) -> bool {
        match self.buffer.delete_backward() {
            Some(range) => {
                self.mark_changed(range, now);
                true
            }
            None => false,
        }
    }

    pub fn delete_forward(&mut self, now: Instant) -> bool {
        match self.buffer.delete_forward() {
            Some(range) => {
                self.mark_changed(range, now);
                true
            }
            None => false,
        }
    }

    // ==================== 高亮防抖 ====================

    pub fn has_pending_highlight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn highlight_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.since + self.highlight_delay)
    }

    /// 距最后一次编辑超过延迟后重新解析并高亮累积范围；返回是否做了高亮
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now.saturating_duration_since(pending.since) < self.highlight_delay {
            return false;
        }
        self.pending = None;

        let Some(syntax) = self.syntax.as_mut() else {
            return false;
        };
        syntax.reparse(self.buffer.rope());

        // 行数变了，缓存的行号已错位，整篇重算
        if self.highlights.len() != self.buffer.len_lines() {
            self.highlight_all();
            return true;
        }

        let Some(syntax) = self.syntax.as_ref() else {
            return false;
        };
        let start = pending.range.start;
        let end = (pending.range.end + 1).min(self.buffer.len_lines());
        let fresh = syntax.highlight_lines(self.buffer.rope(), start, end);
        for (offset, spans) in fresh.into_iter().enumerate() {
            if let Some(slot) = self.highlights.get_mut(start + offset) {
                *slot = spans;
            }
        }
        true
    }

    // ==================== 保存 ====================

    /// 无路径的文档返回 `Ok(false)`，需要先询问路径
    pub fn save(&mut self, fs: &dyn FileProvider) -> Result<bool, FileError> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        fs.write_file(&path, &self.buffer.text())?;
        self.is_changed = false;
        tracing::info!(path = %path.display(), "document saved");
        Ok(true)
    }

    pub fn save_as(&mut self, path: &Path, fs: &dyn FileProvider) -> Result<(), FileError> {
        fs.write_file(path, &self.buffer.text())?;
        self.set_path(path.to_path_buf());
        self.is_changed = false;
        tracing::info!(path = %path.display(), "document saved");
        Ok(())
    }

    /// 文件在磁盘上被改名后跟随新路径；不写盘
    pub fn set_path(&mut self, path: PathBuf) {
        self.title = title_for(&path);
        let language = LanguageId::from_path(&path);
        self.path = Some(path);
        if language != self.default_language {
            self.default_language = language;
            self.rebuild_syntax();
        }
    }
}

fn title_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/document.rs"]
mod tests;
