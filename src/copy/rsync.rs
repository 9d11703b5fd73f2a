//! rsync-backed tree copy

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{TransferSummary, TreeCopier};
use crate::error::{BackupError, BackupResult};

/// Copies trees with `rsync -aH --info=stats2`
#[derive(Debug, Default, Clone)]
pub struct RsyncCopier;

impl RsyncCopier {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        which::which("rsync").is_ok()
    }

    /// Pick the three statistics the engine reports out of rsync's stats block
    pub fn parse_stats(output: &str) -> TransferSummary {
        let mut summary = TransferSummary::default();
        for line in output.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("Number of created files:") {
                summary.created_files = leading_number(rest).unwrap_or(0);
            } else if let Some(rest) = line.strip_prefix("Number of regular files transferred:") {
                summary.transferred_files = leading_number(rest).unwrap_or(0);
            } else if let Some(rest) = line.strip_prefix("Total transferred file size:") {
                summary.transferred_bytes = leading_number(rest).unwrap_or(0);
            }
        }
        summary
    }
}

/// First whitespace-delimited token as a number, ignoring digit grouping
fn leading_number(s: &str) -> Option<u64> {
    let token = s.split_whitespace().next()?;
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Path with a trailing separator so rsync copies the contents, not the dir
fn with_trailing_slash(path: &Path) -> String {
    let mut s = path.to_string_lossy().into_owned();
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}

impl TreeCopier for RsyncCopier {
    fn copy_tree(&self, source: &Path, dest: &Path) -> BackupResult<Option<TransferSummary>> {
        if !source.exists() {
            return Ok(None);
        }

        fs::create_dir_all(dest).map_err(|e| {
            BackupError::Io(format!("Failed to create {}: {}", dest.display(), e))
        })?;

        debug!(source = %source.display(), dest = %dest.display(), "Running rsync");
        let output = Command::new("rsync")
            .arg("-aH")
            .arg("--info=stats2")
            .arg(with_trailing_slash(source))
            .arg(with_trailing_slash(dest))
            .output()
            .map_err(|e| BackupError::Io(format!("Failed to run rsync: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::Io(format!(
                "rsync exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Some(Self::parse_stats(&stdout)))
    }

    fn name(&self) -> &'static str {
        "rsync"
    }
}
