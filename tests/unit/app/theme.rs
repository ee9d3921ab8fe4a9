use super::*;

#[test]
fn parse_color_accepts_names_and_hex() {
    assert_eq!(parse_color("cyan"), Some(Color::Indexed(6)));
    assert_eq!(parse_color(" Dark-Gray "), Some(Color::Indexed(8)));
    assert_eq!(parse_color("reset"), Some(Color::Reset));
    assert_eq!(parse_color("#1e90FF"), Some(Color::Rgb(0x1E, 0x90, 0xFF)));
}

#[test]
fn parse_color_rejects_garbage() {
    assert_eq!(parse_color(""), None);
    assert_eq!(parse_color("#12345"), None);
    assert_eq!(parse_color("#gggggg"), None);
    assert_eq!(parse_color("chartreuse"), None);
}

#[test]
fn default_settings_match_default_theme() {
    let theme = UiTheme::from_settings(&ThemeSettings::default());
    let defaults = UiTheme::default();

    assert_eq!(theme.focus_border, defaults.focus_border);
    assert_eq!(theme.syntax_keyword_fg, defaults.syntax_keyword_fg);
    assert_eq!(theme.hidden_char_fg, defaults.hidden_char_fg);
}

#[test]
fn bad_colors_keep_previous_value() {
    let settings = ThemeSettings {
        focus_border: Some("not-a-color".to_string()),
        syntax_comment: Some("#010203".to_string()),
        ..ThemeSettings::default()
    };
    let theme = UiTheme::from_settings(&settings);

    assert_eq!(theme.focus_border, UiTheme::default().focus_border);
    assert_eq!(theme.syntax_comment_fg, Color::Rgb(1, 2, 3));
}

#[test]
fn highlight_style_uses_syntax_groups() {
    let theme = UiTheme::default();
    assert_eq!(
        theme.highlight_style(HighlightKind::Keyword).fg,
        Some(theme.syntax_keyword_fg)
    );
    assert_eq!(
        theme.highlight_style(HighlightKind::Lifetime).fg,
        Some(theme.syntax_type_fg)
    );
    assert!(theme
        .highlight_style(HighlightKind::Comment)
        .add_modifier
        .contains(Modifier::ITALIC));
}
