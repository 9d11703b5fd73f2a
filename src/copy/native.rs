//! Built-in recursive tree copy
//!
//! Keeps file permissions and symlinks. Hard links are copied as separate
//! files.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{TransferSummary, TreeCopier};
use crate::error::{BackupError, BackupResult};

#[derive(Debug, Default, Clone)]
pub struct NativeCopier;

impl NativeCopier {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(action: &str, path: &Path, err: impl std::fmt::Display) -> BackupError {
    BackupError::Io(format!("Failed to {} {}: {}", action, path.display(), err))
}

#[cfg(unix)]
fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(source)?;
    if fs::symlink_metadata(dest).is_ok() {
        fs::remove_file(dest)?;
    }
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest).map(|_| ())
}

impl TreeCopier for NativeCopier {
    fn copy_tree(&self, source: &Path, dest: &Path) -> BackupResult<Option<TransferSummary>> {
        if !source.exists() {
            return Ok(None);
        }

        fs::create_dir_all(dest).map_err(|e| io_error("create", dest, e))?;
        debug!(source = %source.display(), dest = %dest.display(), "Copying tree");

        let mut summary = TransferSummary::default();
        for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
            let entry = entry.map_err(|e| io_error("read", source, e))?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| io_error("resolve", entry.path(), e))?;
            let target = dest.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if !target.exists() {
                    summary.created_files += 1;
                }
                fs::create_dir_all(&target).map_err(|e| io_error("create", &target, e))?;
            } else if file_type.is_symlink() {
                if fs::symlink_metadata(&target).is_err() {
                    summary.created_files += 1;
                }
                copy_symlink(entry.path(), &target)
                    .map_err(|e| io_error("link", &target, e))?;
            } else {
                if !target.exists() {
                    summary.created_files += 1;
                }
                let bytes = fs::copy(entry.path(), &target)
                    .map_err(|e| io_error("copy", entry.path(), e))?;
                summary.transferred_files += 1;
                summary.transferred_bytes += bytes;
            }
        }

        Ok(Some(summary))
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
