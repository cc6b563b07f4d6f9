use std::path::PathBuf;

use cs_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "cinesearch";

/// `CS_PROFILE=dev` keeps a separate data directory per profile.
fn resolved_app_dir_name(profile: Option<&str>) -> String {
    match profile {
        Some(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves application directories through the `dirs` crate.
pub struct DirsAppDirsAdapter {
    base_override: Option<PathBuf>,
    profile: Option<String>,
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_override: None,
            profile: std::env::var("CS_PROFILE").ok(),
        }
    }

    /// Use `base` instead of the system data-local directory.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_override: Some(base),
            profile: None,
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        match &self.base_override {
            Some(base) => Some(base.clone()),
            None => dirs::data_local_dir(),
        }
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base.join(resolved_app_dir_name(self.profile.as_deref())),
        })
    }
}
