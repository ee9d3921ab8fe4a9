use super::*;

#[test]
fn test_dir_entry_new() {
    let entry = DirEntry::new(PathBuf::from("/test/file.txt"), false);
    assert_eq!(entry.name, "file.txt");
    assert!(!entry.is_dir);
    assert!(entry.is_file);
}

#[test]
fn test_file_error_display() {
    let err = FileError::NotFound(PathBuf::from("/test"));
    assert!(err.to_string().contains("/test"));
}

#[test]
fn test_io_error_converts() {
    let err: FileError = io::Error::new(io::ErrorKind::PermissionDenied, "locked").into();
    assert!(matches!(err, FileError::Io(_)));
    assert!(err.to_string().contains("locked"));
}

#[test]
fn dir_entry_for_root_has_empty_name() {
    let entry = DirEntry::new(PathBuf::from("/"), true);
    assert_eq!(entry.name, "");
    assert!(entry.is_dir);
    assert!(!entry.is_file);
}
