//! Path management for repo-backup
//!
//! Resolves where the settings file lives and where the user's home is.
//!
//! ## Path Resolution Order
//!
//! 1. `REPO_BACKUP_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/repo-backup` on Linux)

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use crate::error::BackupError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "REPO_BACKUP_CONFIG_DIR";

/// Manages the paths used by repo-backup itself
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding config.json
    config_dir: PathBuf,
    /// The user's home directory
    home_dir: PathBuf,
}

impl AppPaths {
    /// Create a new AppPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BackupError> {
        let base = BaseDirs::new()
            .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))?;
        let home_dir = base.home_dir().to_path_buf();

        let config_dir = if let Ok(custom) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "repo-backup")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| home_dir.join(".config").join("repo-backup"))
        };

        Ok(Self {
            config_dir,
            home_dir,
        })
    }

    /// Create AppPaths with explicit directories (useful for testing)
    pub fn with_dirs(config_dir: PathBuf, home_dir: PathBuf) -> Self {
        Self {
            config_dir,
            home_dir,
        }
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Get the user's home directory
    pub fn home_dir(&self) -> &PathBuf {
        &self.home_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Default backups root (~/Backups)
    pub fn default_backups_root(&self) -> PathBuf {
        self.home_dir.join("Backups")
    }

    /// Conventional Steam install locations, most likely first
    pub fn default_runtime_roots(&self) -> Vec<PathBuf> {
        vec![
            self.home_dir.join(".local").join("share").join("Steam"),
            self.home_dir.join(".steam").join("steam"),
        ]
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| BackupError::Io(format!("Failed to create config directory: {}", e)))
    }
}
