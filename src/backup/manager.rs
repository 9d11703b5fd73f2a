//! Backup manager for repo-backup
//!
//! Listing, creation, deletion, renaming and opening of snapshots. Restore
//! lives in `restore.rs`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::{info, warn};

use super::OperationReport;
use crate::config::{AppPaths, EngineConfig, Settings};
use crate::copy::{make_copier, TreeCopier};
use crate::discovery::{
    detect_runtime_root, resolve_app_id, resolve_profile_chain, wait_for_quiescence,
    Environment, RuntimeControl, SteamRuntime,
};
use crate::error::{BackupError, BackupResult};
use crate::safety::contained_join;
use crate::snapshot::{
    self, backup_name, label_prefix, now_stamp, BackupDetail, BackupEntry, SnapshotLayout,
};

/// Result of a successful create
#[derive(Debug, Clone, Serialize)]
pub struct CreateResult {
    /// Name of the new backup
    pub name: String,
    /// Full path to the new backup
    pub path: PathBuf,
    /// What was copied
    pub report: OperationReport,
}

/// Runs backup lifecycle operations against one backups root
pub struct BackupManager {
    config: EngineConfig,
    copier: Box<dyn TreeCopier>,
    runtime: Box<dyn RuntimeControl>,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(
        config: EngineConfig,
        copier: Box<dyn TreeCopier>,
        runtime: Box<dyn RuntimeControl>,
    ) -> Self {
        Self {
            config,
            copier,
            runtime,
        }
    }

    /// Manager wired to the real Steam client and the configured copy backend
    pub fn from_settings(settings: &Settings, paths: &AppPaths) -> Self {
        Self::new(
            EngineConfig::from_settings(settings, paths),
            make_copier(settings.copier),
            Box::new(SteamRuntime::new(settings.process_name.clone())),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get backup directory path
    pub fn backups_root(&self) -> &Path {
        &self.config.backups_root
    }

    pub(super) fn copier(&self) -> &dyn TreeCopier {
        self.copier.as_ref()
    }

    /// Resolve a caller-supplied name to a path inside the backups root
    pub fn backup_path(&self, name: &str) -> BackupResult<PathBuf> {
        contained_join(&self.config.backups_root, name)
    }

    /// Steam root for this operation
    pub(super) fn runtime_root(&self) -> PathBuf {
        detect_runtime_root(&self.config.runtime_roots)
    }

    /// Discover Steam root, app id and profile id for a create
    fn discover(&self) -> BackupResult<Environment> {
        let runtime_root = self.runtime_root();
        let app_id = resolve_app_id(
            &runtime_root,
            &self.config.app_name,
            &self.config.fallback_app_id,
        );
        let profile_id = resolve_profile_chain(&runtime_root, &app_id)?;
        Ok(Environment {
            runtime_root,
            app_id,
            profile_id,
        })
    }

    /// Ask Steam to exit and wait a bounded time for it
    pub(super) fn quiesce(&self, runtime_root: &Path) {
        wait_for_quiescence(
            self.runtime.as_ref(),
            runtime_root,
            self.config.shutdown_poll,
            self.config.shutdown_timeout,
        );
    }

    /// List all backups of `label`, newest first
    pub fn list_backups(&self, label: &str) -> Vec<BackupEntry> {
        snapshot::list_backups(&self.config.backups_root, label, &self.config.home_dir)
    }

    /// Details of a single backup; missing parts are reported empty
    pub fn describe_backup(&self, name: &str) -> BackupDetail {
        snapshot::describe_backup(&self.config.backups_root, name)
    }

    /// Combined size of every backup of `label`
    pub fn total_size(&self, label: &str) -> u64 {
        snapshot::total_size(&self.config.backups_root, label, &self.config.home_dir)
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self, label: &str) -> Option<BackupEntry> {
        self.list_backups(label).into_iter().next()
    }

    /// Snapshot the live game data into `<label>-YYYYMMDD-HHMM`
    pub fn create_backup(&self, label: &str) -> BackupResult<CreateResult> {
        validate_label(label)?;
        let discovered = self.discover();

        // Stop Steam before anything is read, even if discovery failed
        let runtime_root = match &discovered {
            Ok(env) => env.runtime_root.clone(),
            Err(_) => self.runtime_root(),
        };
        self.quiesce(&runtime_root);
        let env = discovered?;

        let name = backup_name(label, &now_stamp());
        let dest = self.backup_path(&name)?;
        if dest.exists() {
            return Err(BackupError::AlreadyExists(name));
        }
        info!(
            backup = %name,
            app_id = %env.app_id,
            profile_id = %env.profile_id,
            "Creating backup"
        );

        let layout = SnapshotLayout::new(dest.clone());
        let compat_src = env.compatdata_dir();
        let mut report = OperationReport::default();

        let copied = self
            .copier
            .copy_tree(&compat_src, &layout.compatdata(&env.app_id))
            .map_err(|e| BackupError::copy_failed("compatdata", e.to_string()))?;
        report.record_copy("compatdata", copied);

        let copied = self
            .copier
            .copy_tree(&env.userdata_dir(), &layout.userdata(&env.app_id))
            .map_err(|e| BackupError::copy_failed("userdata", e.to_string()))?;
        report.record_copy("userdata", copied);

        match find_save_tree(&compat_src, &self.config.save_path) {
            Some(save_src) => {
                let copied = self
                    .copier
                    .copy_tree(&save_src, &layout.saves(label))
                    .map_err(|e| BackupError::copy_failed("saves", e.to_string()))?;
                report.record_copy("saves", copied);
            }
            None => report.record_marker("saves", "not found"),
        }

        info!(backup = %name, summary = %report.summary(), "Backup created");
        Ok(CreateResult {
            name,
            path: dest,
            report,
        })
    }

    /// Permanently remove a backup
    pub fn delete_backup(&self, name: &str) -> BackupResult<()> {
        let path = self.backup_path(name)?;
        if !path.is_dir() {
            return Err(BackupError::backup_not_found(name));
        }

        fs::remove_dir_all(&path).map_err(|e| {
            BackupError::Io(format!("Failed to delete {}: {}", path.display(), e))
        })?;
        info!(backup = name, "Backup deleted");
        Ok(())
    }

    /// Rename a backup; the new name must keep the `<label>-` prefix
    pub fn rename_backup(&self, old_name: &str, new_name: &str, label: &str) -> BackupResult<()> {
        let old_path = self.backup_path(old_name)?;
        let new_path = self.backup_path(new_name)?;

        let prefix = label_prefix(label);
        if !new_name.starts_with(&prefix) {
            return Err(BackupError::InvalidName(format!(
                "name must start with {}",
                prefix
            )));
        }
        single_component(old_name)?;
        single_component(new_name)?;
        if new_path.exists() {
            return Err(BackupError::AlreadyExists(new_name.to_string()));
        }
        if !old_path.is_dir() {
            return Err(BackupError::backup_not_found(old_name));
        }

        fs::rename(&old_path, &new_path).map_err(|e| {
            BackupError::Io(format!("Failed to rename {}: {}", old_name, e))
        })?;
        info!(from = old_name, to = new_name, "Backup renamed");
        Ok(())
    }

    /// Reveal a backup in the desktop file manager
    ///
    /// Only the name check can fail; launcher errors are logged and dropped.
    pub fn open_backup(&self, name: &str) -> BackupResult<()> {
        let path = self.backup_path(name)?;
        let opener = file_manager_command();

        let spawned = Command::new(opener)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            warn!(opener, path = %path.display(), error = %e, "Failed to open backup");
        }
        Ok(())
    }
}

/// Program that opens a directory in the file manager
fn file_manager_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Labels become directory names, so they must be a single path component
fn validate_label(label: &str) -> BackupResult<()> {
    if label.is_empty() || label.contains(['/', '\\']) || label == "." || label == ".." {
        return Err(BackupError::InvalidName(format!("invalid label '{}'", label)));
    }
    Ok(())
}

/// Backup names passed to rename must name a direct child of the backups root
fn single_component(name: &str) -> BackupResult<()> {
    if name.contains(['/', '\\']) {
        return Err(BackupError::InvalidName(format!(
            "'{}' must not contain path separators",
            name
        )));
    }
    Ok(())
}

/// Locate the game's save folder inside a compatdata tree
///
/// Looks under every `pfx/drive_c/users/<user>/<save_path>`. A user whose
/// save folder holds a `Saves` directory wins over one that merely has the
/// folder.
pub fn find_save_tree(compatdata: &Path, save_path: &Path) -> Option<PathBuf> {
    let users = compatdata.join("pfx").join("drive_c").join("users");
    let mut user_dirs: Vec<PathBuf> = fs::read_dir(&users)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .map(|entry| entry.path().join(save_path))
        .collect();
    user_dirs.sort();

    user_dirs
        .iter()
        .find(|candidate| candidate.join("Saves").is_dir())
        .or_else(|| user_dirs.iter().find(|candidate| candidate.is_dir()))
        .cloned()
}
