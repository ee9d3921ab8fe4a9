use super::*;
use tempfile::tempdir;

#[test]
fn saved_paths_reload_in_order() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("cfg").join("recent-projects");
    let paths = [
        PathBuf::from("/work/b/b.qproj"),
        PathBuf::from("/work/a/a.qproj"),
        PathBuf::from("/work/c with space/c.qproj"),
    ];
    let recent = RecentProjects::from_paths(paths.iter().cloned());

    save_recent_projects(&file, &recent).unwrap();
    let loaded = load_recent_projects(&file);

    let loaded: Vec<PathBuf> = loaded.iter().map(Path::to_path_buf).collect();
    assert_eq!(loaded, paths.to_vec());
}

#[test]
fn missing_file_gives_empty_list() {
    let dir = tempdir().unwrap();
    assert!(load_recent_projects(&dir.path().join("nothing")).is_empty());
}

#[test]
fn unreadable_file_falls_back_to_empty_list() {
    let dir = tempdir().unwrap();
    // 目录当文件读会失败，但不是 NotFound
    assert!(load_recent_projects(dir.path()).is_empty());
}

#[test]
fn blank_lines_and_duplicates_are_dropped() {
    let recent = parse_recent_projects(b"/a.qproj\n\n/b.qproj\r\n/a.qproj\n");
    let paths: Vec<&Path> = recent.iter().collect();
    assert_eq!(paths, vec![Path::new("/a.qproj"), Path::new("/b.qproj")]);
}

#[test]
fn surrounding_spaces_survive_reload() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("recent-projects");
    let paths = [
        PathBuf::from(" /lead/a.qproj"),
        PathBuf::from("/trail/b.qproj  "),
    ];
    let recent = RecentProjects::from_paths(paths.iter().cloned());

    save_recent_projects(&file, &recent).unwrap();
    let loaded: Vec<PathBuf> = load_recent_projects(&file)
        .iter()
        .map(Path::to_path_buf)
        .collect();
    assert_eq!(loaded, paths.to_vec());
}

#[cfg(unix)]
#[test]
fn non_utf8_path_survives_reload() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let file = dir.path().join("recent-projects");
    let odd = PathBuf::from(OsStr::from_bytes(b"/work/\xff\xfe/p.qproj"));
    let recent = RecentProjects::from_paths([odd.clone()]);

    save_recent_projects(&file, &recent).unwrap();
    let loaded: Vec<PathBuf> = load_recent_projects(&file)
        .iter()
        .map(Path::to_path_buf)
        .collect();
    assert_eq!(loaded, vec![odd]);
}
