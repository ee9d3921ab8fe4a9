use super::*;

#[test]
fn missing_sections_fall_back_to_defaults() {
    let settings: Settings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings.editor, EditorSettings::default());
    assert_eq!(settings.theme, ThemeSettings::default());
}

#[test]
fn partial_editor_section_keeps_other_defaults() {
    let settings: Settings =
        serde_json::from_str(r#"{ "editor": { "tab_size": 2, "hidden_chars": true } }"#).unwrap();

    assert_eq!(settings.editor.tab_size, 2);
    assert!(settings.editor.hidden_chars);
    assert!(settings.editor.auto_indent);
    assert_eq!(settings.editor.highlight_delay_ms, 100);
}

#[test]
fn theme_roundtrip_preserves_values() {
    let original = ThemeSettings::default();
    let json = serde_json::to_string(&original).expect("serialize ThemeSettings");
    let decoded: ThemeSettings = serde_json::from_str(&json).expect("deserialize ThemeSettings");
    assert_eq!(decoded, original);
}
