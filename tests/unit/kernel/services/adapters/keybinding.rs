use super::*;

#[test]
fn editor_has_cursor_bindings() {
    let service = KeybindingService::new();
    assert_eq!(
        service.resolve(KeybindingContext::Editor, &Key::simple(KeyCode::Left)),
        Some(&Command::CursorLeft)
    );
}

#[test]
fn global_commands_fall_through_in_editor_and_explorer() {
    let service = KeybindingService::new();
    for context in [KeybindingContext::Editor, KeybindingContext::Explorer] {
        assert_eq!(
            service.resolve(context, &Key::ctrl(KeyCode::Char('s'))),
            Some(&Command::Save)
        );
    }
}

#[test]
fn same_key_means_different_things_per_context() {
    let service = KeybindingService::new();
    let up = Key::simple(KeyCode::Up);
    assert_eq!(
        service.resolve(KeybindingContext::Editor, &up),
        Some(&Command::CursorUp)
    );
    assert_eq!(
        service.resolve(KeybindingContext::Explorer, &up),
        Some(&Command::ExplorerUp)
    );
    assert_eq!(service.resolve(KeybindingContext::Global, &up), None);
}

#[test]
fn bind_overrides_and_unbind_falls_back() {
    let mut service = KeybindingService::new();
    let key = Key::ctrl(KeyCode::Char('s'));
    service.bind(KeybindingContext::Editor, key, Command::SaveAs);
    assert_eq!(
        service.resolve(KeybindingContext::Editor, &key),
        Some(&Command::SaveAs)
    );

    assert_eq!(
        service.unbind(KeybindingContext::Editor, &key),
        Some(Command::SaveAs)
    );
    assert_eq!(
        service.resolve(KeybindingContext::Editor, &key),
        Some(&Command::Save)
    );
}

#[test]
fn context_names_parse() {
    assert_eq!(
        KeybindingContext::parse(" Editor "),
        Some(KeybindingContext::Editor)
    );
    assert_eq!(
        KeybindingContext::parse("tree"),
        Some(KeybindingContext::Explorer)
    );
    assert_eq!(KeybindingContext::parse("palette"), None);
}
