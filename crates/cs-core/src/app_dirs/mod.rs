//! Resolved per-user application directories.

use std::path::PathBuf;

/// Facts about where cinesearch may keep its files. No existence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}
