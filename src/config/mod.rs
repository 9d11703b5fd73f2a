//! Configuration module for repo-backup
//!
//! This module provides configuration management including:
//! - Config directory and home resolution
//! - User settings persistence
//! - The explicit engine configuration derived from both

pub mod paths;
pub mod settings;

use std::path::PathBuf;
use std::time::Duration;

pub use paths::AppPaths;
pub use settings::{CopierKind, Settings};

/// Everything the backup engine needs to know about its environment
///
/// Built once by the caller and handed to the engine, so tests can point every
/// path at a temporary directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding every snapshot
    pub backups_root: PathBuf,
    /// Used to render `~`-relative display paths
    pub home_dir: PathBuf,
    /// Prefix of every backup name
    pub label: String,
    /// Display name searched for in the app manifests
    pub app_name: String,
    /// App id used when no manifest matches
    pub fallback_app_id: String,
    /// Candidate Steam install roots, in probe order
    pub runtime_roots: Vec<PathBuf>,
    /// Save folder relative to a Wine user directory
    pub save_path: PathBuf,
    /// Process name polled while waiting for Steam to exit
    pub process_name: String,
    pub shutdown_timeout: Duration,
    pub shutdown_poll: Duration,
}

impl EngineConfig {
    /// Build the engine configuration from settings and resolved paths
    pub fn from_settings(settings: &Settings, paths: &AppPaths) -> Self {
        Self {
            backups_root: settings.backups_root(paths),
            home_dir: paths.home_dir().clone(),
            label: settings.label.clone(),
            app_name: settings.app_name.clone(),
            fallback_app_id: settings.fallback_app_id.clone(),
            runtime_roots: settings.runtime_roots(paths),
            save_path: settings.save_path.iter().collect(),
            process_name: settings.process_name.clone(),
            shutdown_timeout: settings.shutdown_timeout(),
            shutdown_poll: settings.shutdown_poll(),
        }
    }
}
