//! UI 主题：把可配置的颜色集中管理，避免散落在渲染代码里。

use crate::kernel::editor::HighlightKind;
use crate::kernel::services::ports::ThemeSettings;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTheme {
    pub focus_border: Color,
    pub inactive_border: Color,
    pub accent_fg: Color,
    pub header_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub muted_fg: Color,
    pub error_fg: Color,
    pub line_number_fg: Color,
    pub hidden_char_fg: Color,
    pub syntax_comment_fg: Color,
    pub syntax_keyword_fg: Color,
    pub syntax_string_fg: Color,
    pub syntax_number_fg: Color,
    pub syntax_type_fg: Color,
    pub syntax_attribute_fg: Color,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            focus_border: Color::Indexed(6),    // Cyan
            inactive_border: Color::Indexed(8), // DarkGray
            accent_fg: Color::Indexed(3),
            header_fg: Color::Indexed(6),
            selected_bg: Color::Indexed(8),
            selected_fg: Color::Indexed(15), // White
            muted_fg: Color::Indexed(8),
            error_fg: Color::Indexed(1), // Red
            line_number_fg: Color::Indexed(8),
            hidden_char_fg: Color::Indexed(8),
            syntax_comment_fg: Color::Rgb(0x6A, 0x99, 0x55),
            syntax_keyword_fg: Color::Rgb(0x56, 0x9C, 0xD6),
            syntax_string_fg: Color::Rgb(0xCE, 0x91, 0x78),
            syntax_number_fg: Color::Rgb(0xB5, 0xCE, 0xA8),
            syntax_type_fg: Color::Rgb(0x4E, 0xC9, 0xB0),
            syntax_attribute_fg: Color::Rgb(0x4E, 0xC9, 0xB0),
        }
    }
}

/// 解析失败的颜色保持原值
fn apply(slot: &mut Color, value: &Option<String>) {
    match value.as_deref().map(|v| (v, parse_color(v))) {
        Some((_, Some(color))) => *slot = color,
        Some((raw, None)) => tracing::warn!(value = raw, "unrecognized theme color"),
        None => {}
    }
}

impl UiTheme {
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        let mut theme = Self::default();
        theme.apply_settings(settings);
        theme
    }

    pub fn apply_settings(&mut self, settings: &ThemeSettings) {
        apply(&mut self.focus_border, &settings.focus_border);
        apply(&mut self.inactive_border, &settings.inactive_border);
        apply(&mut self.accent_fg, &settings.accent_fg);
        apply(&mut self.header_fg, &settings.header_fg);
        apply(&mut self.selected_bg, &settings.selected_bg);
        apply(&mut self.selected_fg, &settings.selected_fg);
        apply(&mut self.muted_fg, &settings.muted_fg);
        apply(&mut self.error_fg, &settings.error_fg);
        apply(&mut self.line_number_fg, &settings.line_number_fg);
        apply(&mut self.hidden_char_fg, &settings.hidden_char_fg);
        apply(&mut self.syntax_comment_fg, &settings.syntax_comment);
        apply(&mut self.syntax_keyword_fg, &settings.syntax_keyword);
        apply(&mut self.syntax_string_fg, &settings.syntax_string);
        apply(&mut self.syntax_number_fg, &settings.syntax_number);
        apply(&mut self.syntax_type_fg, &settings.syntax_type);
        apply(&mut self.syntax_attribute_fg, &settings.syntax_attribute);
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.focus_border
        } else {
            self.inactive_border
        };
        Style::default().fg(color)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.selected_bg)
            .fg(self.selected_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self, kind: HighlightKind) -> Style {
        let fg = match kind {
            HighlightKind::Comment => self.syntax_comment_fg,
            HighlightKind::String => self.syntax_string_fg,
            HighlightKind::Keyword => self.syntax_keyword_fg,
            HighlightKind::Type | HighlightKind::Lifetime => self.syntax_type_fg,
            HighlightKind::Number => self.syntax_number_fg,
            HighlightKind::Attribute => self.syntax_attribute_fg,
        };
        let style = Style::default().fg(fg);
        if kind == HighlightKind::Comment {
            style.add_modifier(Modifier::ITALIC)
        } else {
            style
        }
    }
}

pub fn parse_color(value: &str) -> Option<Color> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    if let Some(hex) = v.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    let v = v.to_ascii_lowercase().replace('-', "_");
    let c = match v.as_str() {
        "reset" | "default" => Color::Reset,
        "black" => Color::Indexed(0),
        "red" => Color::Indexed(1),
        "green" => Color::Indexed(2),
        "yellow" => Color::Indexed(3),
        "blue" => Color::Indexed(4),
        "magenta" => Color::Indexed(5),
        "cyan" => Color::Indexed(6),
        "gray" | "grey" => Color::Indexed(7),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Color::Indexed(8),
        "light_red" => Color::Indexed(9),
        "light_green" => Color::Indexed(10),
        "light_yellow" => Color::Indexed(11),
        "light_blue" => Color::Indexed(12),
        "light_magenta" => Color::Indexed(13),
        "light_cyan" => Color::Indexed(14),
        "white" => Color::Indexed(15),
        _ => return None,
    };

    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/app/theme.rs"]
mod tests;
