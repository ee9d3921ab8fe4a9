use super::*;
use tempfile::tempdir;

#[test]
fn parses_modifiers_and_named_keys() {
    assert_eq!(
        parse_keybinding("ctrl+shift+s"),
        Some(Key::ctrl_shift(KeyCode::Char('s')))
    );
    assert_eq!(parse_keybinding("F5"), Some(Key::simple(KeyCode::F(5))));
    assert_eq!(parse_keybinding("alt + left"), Some(Key::alt(KeyCode::Left)));
    assert_eq!(parse_keybinding("ctrl+S"), Some(Key::ctrl_shift(KeyCode::Char('s'))));
    assert_eq!(parse_keybinding("f"), Some(Key::simple(KeyCode::Char('f'))));
    assert_eq!(parse_keybinding("ctrl+"), None);
    assert_eq!(parse_keybinding("ctrl+a+b"), None);
    assert_eq!(parse_keybinding("f99"), None);
    assert_eq!(parse_keybinding("hyper"), None);
}

#[test]
fn hotkey_line_with_and_without_context() {
    assert_eq!(
        parse_hotkey_line("ctrl+k = build"),
        Ok(Some(Hotkey {
            context: KeybindingContext::Global,
            key: Key::ctrl(KeyCode::Char('k')),
            command: Command::Build,
        }))
    );
    assert_eq!(
        parse_hotkey_line("  n = explorerNewFile @ explorer "),
        Ok(Some(Hotkey {
            context: KeybindingContext::Explorer,
            key: Key::simple(KeyCode::Char('n')),
            command: Command::ExplorerNewFile,
        }))
    );
    assert_eq!(parse_hotkey_line("# comment"), Ok(None));
    assert_eq!(parse_hotkey_line("   "), Ok(None));
}

#[test]
fn bad_hotkey_lines_are_errors() {
    assert!(parse_hotkey_line("ctrl+k build").is_err());
    assert!(parse_hotkey_line("ctrl+k = fly").is_err());
    assert!(parse_hotkey_line("hyper+k = build").is_err());
    assert!(parse_hotkey_line("ctrl+k = build @ palette").is_err());
}

#[test]
fn apply_hotkeys_skips_bad_lines() {
    let mut service = KeybindingService::new();
    let applied = apply_hotkeys(
        &mut service,
        "# mine\nctrl+k = build\nnonsense\nalt+up = explorerUp @ explorer\n",
    );
    assert_eq!(applied, 2);
    assert_eq!(
        service.resolve(KeybindingContext::Editor, &Key::ctrl(KeyCode::Char('k'))),
        Some(&Command::Build)
    );
    assert_eq!(
        service.resolve(KeybindingContext::Explorer, &Key::alt(KeyCode::Up)),
        Some(&Command::ExplorerUp)
    );
}

#[test]
fn load_settings_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    assert_eq!(load_settings(&path).editor.tab_size, 4);

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_settings(&path).editor.tab_size, 4);

    std::fs::write(&path, r#"{ "editor": { "tab_size": 2 } }"#).unwrap();
    assert_eq!(load_settings(&path).editor.tab_size, 2);
}
