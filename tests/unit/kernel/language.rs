use crate::kernel::language::LanguageId;
use std::path::Path;

#[test]
fn from_path_maps_extensions() {
    let cases = [
        ("a.rs", Some(LanguageId::Rust)),
        ("a.go", Some(LanguageId::Go)),
        ("a.pyi", Some(LanguageId::Python)),
        ("a.jsx", Some(LanguageId::JavaScript)),
        ("a.mts", Some(LanguageId::TypeScript)),
        ("a.tsx", Some(LanguageId::Tsx)),
        ("a.c", Some(LanguageId::C)),
        ("a.h", Some(LanguageId::Cpp)),
        ("a.java", Some(LanguageId::Java)),
        ("Cargo.TOML", Some(LanguageId::Toml)),
        ("run.sh", Some(LanguageId::Bash)),
        ("q.sql", Some(LanguageId::Sql)),
        ("a.txt", None),
        ("Makefile", None),
    ];

    for (path, expected) in cases {
        assert_eq!(LanguageId::from_path(Path::new(path)), expected, "{path}");
    }
}

#[test]
fn from_name_accepts_id_or_display_name() {
    assert_eq!(LanguageId::from_name("rust"), Some(LanguageId::Rust));
    assert_eq!(LanguageId::from_name("C++"), Some(LanguageId::Cpp));
    assert_eq!(LanguageId::from_name(" Python "), Some(LanguageId::Python));
    assert_eq!(LanguageId::from_name("cobol"), None);
}

#[test]
fn comment_prefix_per_family() {
    assert_eq!(LanguageId::Rust.comment_prefix(), "//");
    assert_eq!(LanguageId::Python.comment_prefix(), "#");
    assert_eq!(LanguageId::Sql.comment_prefix(), "--");
}
