use serde::{Deserialize, Serialize};

/// `settings.json` 的内容；缺失字段一律取默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub theme: ThemeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub tab_size: usize,
    pub show_line_numbers: bool,
    /// 显示空白字符（空格 / 制表符 / 行尾）
    pub hidden_chars: bool,
    pub auto_indent: bool,
    pub highlight_delay_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            show_line_numbers: true,
            hidden_chars: false,
            auto_indent: true,
            highlight_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_char_fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_attribute: Option<String>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            focus_border: Some("cyan".to_string()),
            inactive_border: Some("dark_gray".to_string()),
            accent_fg: Some("yellow".to_string()),
            header_fg: Some("cyan".to_string()),
            selected_bg: Some("dark_gray".to_string()),
            selected_fg: Some("white".to_string()),
            muted_fg: Some("dark_gray".to_string()),
            error_fg: Some("red".to_string()),
            line_number_fg: Some("dark_gray".to_string()),
            hidden_char_fg: Some("dark_gray".to_string()),
            syntax_comment: Some("#6A9955".to_string()),
            syntax_keyword: Some("#569CD6".to_string()),
            syntax_string: Some("#CE9178".to_string()),
            syntax_number: Some("#B5CEA8".to_string()),
            syntax_type: Some("#4EC9B0".to_string()),
            syntax_attribute: Some("#4EC9B0".to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
