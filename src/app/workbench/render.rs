use super::util;
use super::Workbench;
use crate::kernel::editor::HighlightSpan;
use crate::kernel::{Document, FocusTarget};
use crate::models::{Icon, NodeTag, TreeRow};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const HIDDEN_SPACE: &str = "·";
const HIDDEN_TAB: &str = "→";
const HIDDEN_EOL: &str = "¶";

pub(super) fn render(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    workbench.layout.cursor = None;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(super::HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(super::STATUS_HEIGHT),
        ])
        .split(area);

    render_header(workbench, frame, chunks[0]);
    render_body(workbench, frame, chunks[1]);
    render_status(workbench, frame, chunks[2]);
    render_overlays(workbench, frame, area);
}

fn render_header(workbench: &Workbench, frame: &mut Frame, area: Rect) {
    let state = workbench.store.state();
    let mut spans = vec![Span::styled(
        " quire ",
        Style::default()
            .fg(workbench.theme.header_fg)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(doc) = state.active_document() {
        let location = doc
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| doc.title().to_string());
        spans.push(Span::styled(
            location,
            Style::default().fg(workbench.theme.muted_fg),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let sidebar_visible = workbench.store.state().ui.sidebar_visible;
    let (sidebar_area, main_area) = if sidebar_visible && area.width > super::SIDEBAR_MIN_WIDTH {
        let width = (u32::from(area.width) * u32::from(super::SIDEBAR_WIDTH_PERCENT) / 100) as u16;
        let width = width.max(super::SIDEBAR_MIN_WIDTH);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width), Constraint::Min(0)])
            .split(area);
        (Some(columns[0]), columns[1])
    } else {
        (None, area)
    };

    workbench.layout.sidebar = sidebar_area;
    if let Some(sidebar) = sidebar_area {
        render_sidebar(workbench, frame, sidebar);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(main_area);
    render_tabs(workbench, frame, rows[0]);
    render_editor(workbench, frame, rows[1]);
}

// ==================== 项目树 ====================

fn tree_row_label(row: &TreeRow, selected: bool) -> String {
    let indent = "  ".repeat(row.depth as usize);
    let marker = match row.tag {
        NodeTag::File => " ",
        _ if row.is_expanded => "▾",
        _ => "▸",
    };
    let icon = if selected {
        row.icons.selected
    } else {
        row.icons.image
    };
    let glyph = match icon {
        Icon::Project => "◆",
        Icon::Folder => "▪",
        Icon::File => "·",
    };
    format!("{indent}{marker}{glyph} {}", row.text)
}

fn render_sidebar(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let state = workbench.store.state();
    let focused = state.ui.focus == FocusTarget::Explorer;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Projects ")
        .border_style(workbench.theme.border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tree = state.explorer.tree();
    let rows = tree.flatten_for_view();
    let selected = tree.selected();
    let height = inner.height as usize;

    if let Some(index) = selected.and_then(|id| rows.iter().position(|r| r.id == id)) {
        workbench.tree_scroll = util::scroll_to_fit(workbench.tree_scroll, index, height);
    }
    workbench.tree_scroll = workbench
        .tree_scroll
        .min(rows.len().saturating_sub(height.max(1)));

    let lines: Vec<Line> = rows
        .iter()
        .skip(workbench.tree_scroll)
        .take(height)
        .map(|row| {
            let is_selected = Some(row.id) == selected;
            let style = if is_selected && focused {
                workbench.theme.selected_style()
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else if row.tag == NodeTag::Project {
                Style::default().fg(workbench.theme.accent_fg)
            } else {
                Style::default()
            };
            Line::from(Span::styled(tree_row_label(row, is_selected), style))
        })
        .collect();

    if lines.is_empty() {
        let hint = Paragraph::new("No projects open")
            .style(Style::default().fg(workbench.theme.muted_fg))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

// ==================== 标签栏 ====================

fn render_tabs(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let state = workbench.store.state();
    let mut spans = Vec::new();
    let mut tab_spans = Vec::with_capacity(state.documents.len());
    let mut col: u16 = 0;

    for (index, doc) in state.documents.iter().enumerate() {
        let label = format!(" {} ", doc.window_title());
        let width = label.width() as u16;
        let style = if state.active == Some(index) {
            workbench.theme.selected_style()
        } else {
            Style::default().fg(workbench.theme.muted_fg)
        };
        tab_spans.push((col, col.saturating_add(width)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("│"));
        col = col.saturating_add(width + 1);
    }

    workbench.layout.tabs = Some(area);
    workbench.layout.tab_spans = tab_spans;
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ==================== 编辑区 ====================

/// 行内第 `grapheme_col` 个字素之前的显示宽度（tab 展开到制表位）
fn display_col(line: &str, grapheme_col: usize, tab_size: usize) -> usize {
    let mut col = 0usize;
    for g in line.graphemes(true).take(grapheme_col) {
        col += grapheme_width(g, col, tab_size);
    }
    col
}

fn grapheme_width(g: &str, col: usize, tab_size: usize) -> usize {
    if g == "\t" {
        tab_size - col % tab_size
    } else {
        g.width()
    }
}

fn style_at(spans: &[HighlightSpan], byte: usize, workbench: &Workbench) -> Style {
    spans
        .iter()
        .find(|span| span.start <= byte && byte < span.end)
        .map(|span| workbench.theme.highlight_style(span.kind))
        .unwrap_or_default()
}

/// 一行文本按横向滚动裁剪成 spans
fn render_line<'a>(
    workbench: &Workbench,
    doc: &Document,
    row: usize,
    line: &str,
    hscroll: usize,
    width: usize,
) -> Vec<Span<'a>> {
    let hidden = workbench.store.state().ui.hidden_chars;
    let hidden_style = Style::default().fg(workbench.theme.hidden_char_fg);
    let highlights = doc.highlight_line(row);
    let tab_size = doc.tab_size();
    let end_col = hscroll + width;

    let mut spans = Vec::new();
    let mut col = 0usize;
    for (byte, g) in line.grapheme_indices(true) {
        if col >= end_col {
            break;
        }
        let w = grapheme_width(g, col, tab_size);
        let start = col;
        col += w;
        if col <= hscroll {
            continue;
        }
        // 左边被截断的宽字符 / tab 用空格补齐
        let visible = col - start.max(hscroll);

        let (text, style) = match g {
            "\t" if hidden => {
                let rest = " ".repeat(visible.saturating_sub(1));
                (format!("{HIDDEN_TAB}{rest}"), hidden_style)
            }
            "\t" => (" ".repeat(visible), Style::default()),
            " " if hidden => (HIDDEN_SPACE.to_string(), hidden_style),
            _ if start < hscroll => (" ".repeat(visible), Style::default()),
            _ => (g.to_string(), style_at(highlights, byte, workbench)),
        };
        spans.push(Span::styled(text, style));
    }

    if hidden && col >= hscroll && col < end_col && row + 1 < doc.buffer().len_lines() {
        spans.push(Span::styled(HIDDEN_EOL, hidden_style));
    }
    spans
}

fn render_editor(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let focused = workbench.store.state().ui.focus == FocusTarget::Editor;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(workbench.theme.border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    workbench.layout.editor = Some(area);

    let Some(doc) = workbench.store.state().active_document() else {
        let hint = Paragraph::new("No document open. Ctrl+N creates one, Ctrl+O opens a file.")
            .style(Style::default().fg(workbench.theme.muted_fg))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    };

    let buffer = doc.buffer();
    let total = buffer.len_lines().max(1);
    let gutter = if workbench.store.state().ui.show_line_numbers {
        total.to_string().len() + 1
    } else {
        0
    };
    let text_width = (inner.width as usize).saturating_sub(gutter);
    let height = inner.height as usize;

    // 光标移动过才让视口跟随
    let (cur_row, cur_col) = buffer.cursor();
    let cursor_line = buffer.line(cur_row).unwrap_or_default();
    let cursor_x = display_col(&cursor_line, cur_col, doc.tab_size());
    let marker = (doc.id(), (cur_row, cur_col));
    if workbench.last_cursor != Some(marker) {
        if workbench.last_cursor.map(|(id, _)| id) != Some(doc.id()) {
            workbench.scroll = (0, 0);
        }
        workbench.scroll.0 = util::scroll_to_fit(workbench.scroll.0, cur_row, height);
        workbench.scroll.1 = util::scroll_to_fit(workbench.scroll.1, cursor_x, text_width);
        workbench.last_cursor = Some(marker);
    }
    let (top, hscroll) = workbench.scroll;

    let number_style = Style::default().fg(workbench.theme.line_number_fg);
    let lines: Vec<Line> = (top..total.min(top + height))
        .map(|row| {
            let mut spans = Vec::new();
            if gutter > 0 {
                spans.push(Span::styled(
                    format!("{:>width$} ", row + 1, width = gutter - 1),
                    number_style,
                ));
            }
            let text = buffer.line(row).unwrap_or_default();
            spans.extend(render_line(workbench, doc, row, &text, hscroll, text_width));
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let visible_row = cur_row.checked_sub(top).filter(|r| *r < height);
    let visible_col = cursor_x.checked_sub(hscroll).filter(|c| *c < text_width);
    if let (true, Some(r), Some(c)) = (focused, visible_row, visible_col) {
        workbench.layout.cursor = Some((
            inner.x + (gutter + c) as u16,
            inner.y + r as u16,
        ));
    }
}

// ==================== 状态栏 ====================

fn render_status(workbench: &Workbench, frame: &mut Frame, area: Rect) {
    let state = workbench.store.state();
    let mut left = String::new();
    if let Some(doc) = state.active_document() {
        let (row, col) = doc.buffer().cursor();
        let language = doc.language().map(|l| l.display_name()).unwrap_or("Plain Text");
        left = format!(" Ln {}, Col {}  {}  ", row + 1, col + 1, language);
    }
    let focus = match state.ui.focus {
        FocusTarget::Explorer => "PROJECTS",
        FocusTarget::Editor => "EDITOR",
    };

    let spans = vec![
        Span::styled(
            format!(" {focus} "),
            Style::default()
                .fg(workbench.theme.selected_fg)
                .bg(workbench.theme.selected_bg),
        ),
        Span::raw(left),
        Span::styled(
            workbench.last_log.clone().unwrap_or_default(),
            Style::default().fg(workbench.theme.muted_fg),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ==================== 模态框 ====================

fn dialog_block<'a>(workbench: &Workbench, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(workbench.theme.focus_border))
}

fn render_overlays(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let ui = &workbench.store.state().ui;

    // 同时存在时只画最上层，和按键分发的优先级一致
    if let Some(message) = ui.messages.front() {
        let lines = vec![
            Line::from(message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] OK",
                Style::default().fg(workbench.theme.muted_fg),
            )),
        ];
        render_popup(workbench, frame, area, "Message", lines);
        return;
    }

    if ui.save_prompt.visible() {
        let lines = vec![
            Line::from(ui.save_prompt.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "[s] Save  [d] Don't Save  [c] Cancel",
                Style::default().fg(workbench.theme.muted_fg),
            )),
        ];
        render_popup(workbench, frame, area, "Unsaved Changes", lines);
        return;
    }

    if ui.confirm_dialog.visible {
        let lines = vec![
            Line::from(ui.confirm_dialog.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "[y] Yes  [n] No",
                Style::default().fg(workbench.theme.muted_fg),
            )),
        ];
        render_popup(workbench, frame, area, "Confirm", lines);
        return;
    }

    if ui.input_dialog.visible {
        render_input_dialog(workbench, frame, area);
    }
}

fn render_popup(
    workbench: &Workbench,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
) {
    let popup = util::centered_rect(60, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(dialog_block(workbench, title))
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn render_input_dialog(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    let dialog = &workbench.store.state().ui.input_dialog;
    let popup = util::centered_rect(60, 4, area);
    let block = dialog_block(workbench, &dialog.title);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // 输入框太窄时让光标附近的内容可见
    let before = dialog.value[..dialog.cursor.min(dialog.value.len())].width();
    let width = inner.width.saturating_sub(1) as usize;
    let skip = before.saturating_sub(width);
    let mut shown = String::new();
    let mut col = 0usize;
    for g in dialog.value.graphemes(true) {
        let w = g.width();
        if col >= skip {
            shown.push_str(g);
        }
        col += w;
    }

    let mut lines = vec![Line::from(shown)];
    if let Some(error) = &dialog.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(workbench.theme.error_fg),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    workbench.layout.cursor = Some((inner.x + (before - skip) as u16, inner.y));
}
