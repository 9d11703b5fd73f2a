//! User settings for repo-backup
//!
//! Manages which game is being backed up, where backups live, where Steam is
//! expected to be installed and how the copy backend is chosen.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::BackupError;

/// Which tree copy backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CopierKind {
    /// rsync when it is on the search path, the built-in copier otherwise
    #[default]
    Auto,
    /// Always shell out to rsync
    Rsync,
    /// Always use the built-in copier
    Native,
}

/// User settings for repo-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Prefix of every backup name
    #[serde(default = "default_label")]
    pub label: String,

    /// Display name searched for in the Steam app manifests
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// App id used when no manifest matches
    #[serde(default = "default_fallback_app_id")]
    pub fallback_app_id: String,

    /// Where backups are stored (defaults to ~/Backups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups_root: Option<PathBuf>,

    /// Candidate Steam install roots, in probe order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_roots: Option<Vec<PathBuf>>,

    /// Save folder relative to a Wine user directory
    #[serde(default = "default_save_path")]
    pub save_path: Vec<String>,

    /// Process name polled while waiting for Steam to exit
    #[serde(default = "default_process_name")]
    pub process_name: String,

    /// Upper bound on the wait for Steam to exit
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,

    /// Poll interval while waiting for Steam to exit
    #[serde(default = "default_shutdown_poll_ms")]
    pub shutdown_poll_ms: u64,

    /// Tree copy backend
    #[serde(default)]
    pub copier: CopierKind,
}

fn default_schema_version() -> u32 {
    1
}

fn default_label() -> String {
    "REPO".to_string()
}

fn default_app_name() -> String {
    "repo".to_string()
}

fn default_fallback_app_id() -> String {
    "3241660".to_string()
}

fn default_save_path() -> Vec<String> {
    ["AppData", "LocalLow", "semiwork", "Repo"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_process_name() -> String {
    "steam".to_string()
}

fn default_shutdown_timeout_ms() -> u64 {
    5000
}

fn default_shutdown_poll_ms() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            label: default_label(),
            app_name: default_app_name(),
            fallback_app_id: default_fallback_app_id(),
            backups_root: None,
            runtime_roots: None,
            save_path: default_save_path(),
            process_name: default_process_name(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            shutdown_poll_ms: default_shutdown_poll_ms(),
            copier: CopierKind::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackupError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackupError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            BackupError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings that would make backup names ambiguous
    pub fn validate(&self) -> Result<(), BackupError> {
        if self.label.is_empty() || self.label.contains(['/', '\\']) {
            return Err(BackupError::Config(format!(
                "Invalid label '{}': must be non-empty and contain no path separators",
                self.label
            )));
        }
        if self.shutdown_poll_ms == 0 {
            return Err(BackupError::Config("shutdown_poll_ms must be positive".into()));
        }
        Ok(())
    }

    /// Resolved backups root
    pub fn backups_root(&self, paths: &AppPaths) -> PathBuf {
        self.backups_root
            .clone()
            .unwrap_or_else(|| paths.default_backups_root())
    }

    /// Resolved Steam root candidates
    pub fn runtime_roots(&self, paths: &AppPaths) -> Vec<PathBuf> {
        match &self.runtime_roots {
            Some(roots) if !roots.is_empty() => roots.clone(),
            _ => paths.default_runtime_roots(),
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn shutdown_poll(&self) -> Duration {
        Duration::from_millis(self.shutdown_poll_ms)
    }
}
