use tempfile::tempdir;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn no_args_opens_nothing() {
    let dir = tempdir().unwrap();
    let paths = super::resolve_startup_paths(dir.path(), &[]).unwrap();
    assert!(paths.is_empty());
}

#[test]
fn relative_file_args_resolve_against_cwd() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();
    std::fs::create_dir_all(cwd.join("src")).unwrap();
    std::fs::write(cwd.join("src/a.txt"), "hello\n").unwrap();
    std::fs::write(cwd.join("b.rs"), "").unwrap();

    let paths = super::resolve_startup_paths(cwd, &args(&["src/a.txt", "b.rs"])).unwrap();
    assert_eq!(paths, vec![cwd.join("src/a.txt"), cwd.join("b.rs")]);
}

#[test]
fn folder_arg_resolves_to_its_project_descriptor() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();
    let project = cwd.join("demo");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("notes.txt"), "").unwrap();
    std::fs::write(project.join("demo.qproj"), "{}").unwrap();

    let paths = super::resolve_startup_paths(cwd, &args(&["demo"])).unwrap();
    assert_eq!(paths, vec![project.join("demo.qproj")]);
}

#[test]
fn folder_without_descriptor_is_rejected() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("plain")).unwrap();

    let err = super::resolve_startup_paths(dir.path(), &args(&["plain"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn missing_path_errors() {
    let dir = tempdir().unwrap();

    let err = super::resolve_startup_paths(dir.path(), &args(&["nope"])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn absolute_paths_are_kept() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("abs.txt");
    std::fs::write(&file, "").unwrap();
    let raw = file.to_string_lossy().to_string();

    let other = tempdir().unwrap();
    let paths = super::resolve_startup_paths(other.path(), &args(&[&raw])).unwrap();
    assert_eq!(paths, vec![file]);
}
