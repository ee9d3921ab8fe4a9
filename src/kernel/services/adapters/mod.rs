//! Service adapters: OS specific implementations (disk, config files, key maps).

pub mod file;
pub mod keybinding;
pub mod paths;
pub mod recent;
pub mod settings;

pub use file::LocalFileProvider;
pub use keybinding::{KeybindingContext, KeybindingService};
pub use paths::{ensure_config_dir, ensure_log_dir, get_config_dir, get_log_dir};
pub use recent::{get_recent_projects_path, load_recent_projects, save_recent_projects};
pub use settings::{
    apply_hotkeys, ensure_settings_file, get_keys_path, get_settings_path, load_hotkeys,
    load_settings, parse_hotkey_line, parse_keybinding, Hotkey,
};
