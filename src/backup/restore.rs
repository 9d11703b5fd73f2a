//! Backup restoration for repo-backup
//!
//! Live trees are renamed to `<path>.bak-YYYYMMDD-HHMM` before the snapshot is
//! copied over them. A failed copy leaves the renamed trees where they are.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::{BackupManager, OperationReport};
use crate::discovery::{compatdata_dir, resolve_profile_chain};
use crate::error::{BackupError, BackupResult};
use crate::snapshot::{aside_path, dir_non_empty, first_child_dir, now_stamp, SnapshotLayout};

/// Result of a restore operation
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    /// Name of the restored backup
    pub name: String,
    /// What was copied
    pub report: OperationReport,
    /// Live trees moved aside before overwriting
    pub set_aside: Vec<PathBuf>,
}

/// A live tree and the `.bak-<stamp>` sibling it will be moved to
struct Aside {
    live: PathBuf,
    target: PathBuf,
}

/// Plan moving `path` aside; `None` when nothing lives there
///
/// Fails with `AsideExists` if the target is already taken.
fn plan_aside(path: &Path, stamp: &str) -> BackupResult<Option<Aside>> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(None);
    }

    let target = aside_path(path, stamp);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(BackupError::AsideExists(target));
    }
    Ok(Some(Aside {
        live: path.to_path_buf(),
        target,
    }))
}

fn move_aside(aside: Aside, moved: &mut Vec<PathBuf>) -> BackupResult<()> {
    fs::rename(&aside.live, &aside.target).map_err(|e| {
        BackupError::Io(format!("Failed to move {} aside: {}", aside.live.display(), e))
    })?;
    info!(from = %aside.live.display(), to = %aside.target.display(), "Moved live data aside");
    moved.push(aside.target);
    Ok(())
}

impl BackupManager {
    /// Saves tree stored in a snapshot: `saves/<label>`, else any folder under `saves`
    fn snapshot_saves(&self, layout: &SnapshotLayout) -> Option<PathBuf> {
        let preferred = layout.saves(&self.config().label);
        if preferred.is_dir() {
            return Some(preferred);
        }
        let saves_root = layout.root().join("saves");
        first_child_dir(&saves_root).map(|name| saves_root.join(name))
    }

    /// Replace the live game data with the contents of backup `name`
    pub fn restore_backup(&self, name: &str) -> BackupResult<RestoreResult> {
        let path = self.backup_path(name)?;
        if !path.is_dir() {
            return Err(BackupError::backup_not_found(name));
        }
        let layout = SnapshotLayout::new(path);

        let app_id = layout
            .app_id()
            .ok_or_else(|| BackupError::MissingData(format!("{} has no compatdata", name)))?;

        let runtime_root = self.runtime_root();
        let profile_id = resolve_profile_chain(&runtime_root, &app_id)?;

        let compat_src = layout.compatdata(&app_id);
        let user_src = layout.userdata(&app_id);
        let saves_src = self.snapshot_saves(&layout);
        let has_compat = dir_non_empty(&compat_src);
        let has_user = dir_non_empty(&user_src);

        if !has_compat && !has_user && saves_src.is_none() {
            return Err(BackupError::EmptyBackup(name.to_string()));
        }

        let compat_dst = compatdata_dir(&runtime_root, &app_id);
        let user_dst = runtime_root.join("userdata").join(&profile_id).join(&app_id);

        // Every aside target is checked before the first rename
        let stamp = now_stamp();
        let asides = [
            plan_aside(&compat_dst, &stamp)?,
            plan_aside(&user_dst, &stamp)?,
        ];

        self.quiesce(&runtime_root);
        info!(backup = name, app_id = %app_id, profile_id = %profile_id, "Restoring backup");

        let mut moved = Vec::new();
        for aside in asides.into_iter().flatten() {
            move_aside(aside, &mut moved)?;
        }

        let mut report = OperationReport::default();
        if has_compat {
            let copied = self
                .copier()
                .copy_tree(&compat_src, &compat_dst)
                .map_err(|e| BackupError::copy_failed("compatdata", e.to_string()))?;
            report.record_copy("compatdata", copied);
        }
        if has_user {
            let copied = self
                .copier()
                .copy_tree(&user_src, &user_dst)
                .map_err(|e| BackupError::copy_failed("userdata", e.to_string()))?;
            report.record_copy("userdata", copied);
        }

        match saves_src {
            None => report.record_marker("saves", "none"),
            Some(saves_src) => {
                let users = compat_dst.join("pfx").join("drive_c").join("users");
                match first_child_dir(&users) {
                    Some(user) => {
                        let saves_dst = users.join(user).join(&self.config().save_path);
                        if let Some(aside) = plan_aside(&saves_dst, &stamp)? {
                            move_aside(aside, &mut moved)?;
                        }
                        fs::create_dir_all(&saves_dst).map_err(|e| {
                            BackupError::Io(format!(
                                "Failed to create {}: {}",
                                saves_dst.display(),
                                e
                            ))
                        })?;
                        let copied = self
                            .copier()
                            .copy_tree(&saves_src, &saves_dst)
                            .map_err(|e| BackupError::copy_failed("saves", e.to_string()))?;
                        report.record_copy("saves", copied);
                    }
                    None => {
                        warn!(users = %users.display(), "No Wine user directory, saves not restored");
                        report.record_marker("saves", "no live user directory");
                    }
                }
            }
        }

        info!(backup = name, summary = %report.summary(), "Restore complete");
        Ok(RestoreResult {
            name: name.to_string(),
            report,
            set_aside: moved,
        })
    }
}
