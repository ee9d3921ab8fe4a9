//! Service ports: traits + data contracts.

pub mod file;
pub mod settings;

pub use file::{DirEntry, FileError, FileMetadata, FileProvider, Result as FileResult};
pub use settings::{EditorSettings, Settings, ThemeSettings};
