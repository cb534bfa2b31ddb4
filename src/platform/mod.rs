// mdshare platform paths
// Resolves per-user directories through `directories`, falling back to the
// working directory when the platform reports no home directory.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "mdshare")
}

/// Returns the configuration directory, e.g. `~/.config/mdshare` on Linux.
pub fn get_config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".mdshare"))
}

/// Returns the data directory, e.g. `~/.local/share/mdshare` on Linux.
pub fn get_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".mdshare"))
}

/// Directory holding the CLI's local key-value slots.
pub fn get_store_dir() -> PathBuf {
    get_data_dir().join("store")
}

/// Default server database file.
pub fn get_database_path() -> PathBuf {
    get_data_dir().join("mdshare.db")
}
