use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn leaderboard_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("leaderboard.json"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "plink").map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Prefer the XDG state directory; fall back to the platform data dir.
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("plink"),
            )
        } else {
            ProjectDirs::from("", "", "plink")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
