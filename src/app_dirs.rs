use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "numdrill";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Directory holding one JSON file per saved game configuration.
    pub fn config_dir() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().to_path_buf())
    }

    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            Self::project().map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn results_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("results.csv"))
    }

    pub fn debug_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(format!("{APP_NAME}.log")))
    }
}
