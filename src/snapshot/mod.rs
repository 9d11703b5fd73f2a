//! Snapshot directory model
//!
//! A backup is a plain directory under the backups root:
//!
//! ```text
//! <root>/<label>-YYYYMMDD-HHMM/
//!     compatdata/<app_id>/...
//!     userdata/<app_id>/...
//!     saves/<label>/...
//! ```
//!
//! The filesystem is the only index; every listing re-reads it.

pub mod naming;
pub mod size;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

pub use naming::{aside_path, backup_name, label_prefix, now_stamp, parse_backup_timestamp};
pub use size::{dir_size, humanize};

/// One backup as shown in a listing
#[derive(Debug, Clone, Serialize)]
pub struct BackupEntry {
    /// Directory name, `<label>-YYYYMMDD-HHMM` unless renamed
    pub name: String,
    /// Full path to the backup
    pub path: PathBuf,
    /// Path relative to home, prefixed with `~`
    pub display_path: String,
    /// Sum of file sizes in the tree
    pub size_bytes: u64,
    pub size_human: String,
    /// Creation time parsed from the name, if it still carries one
    pub created_at: Option<NaiveDateTime>,
}

/// Details of a single backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupDetail {
    pub name: String,
    pub path: PathBuf,
    /// First directory under `compatdata`, empty if none
    pub app_id: String,
    pub size_human: String,
}

/// Subtree layout of one snapshot directory
#[derive(Debug, Clone)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compatdata_base(&self) -> PathBuf {
        self.root.join("compatdata")
    }

    pub fn compatdata(&self, app_id: &str) -> PathBuf {
        self.compatdata_base().join(app_id)
    }

    pub fn userdata(&self, app_id: &str) -> PathBuf {
        self.root.join("userdata").join(app_id)
    }

    pub fn saves(&self, label: &str) -> PathBuf {
        self.root.join("saves").join(label)
    }

    /// App id recorded in the snapshot (first directory under `compatdata`)
    pub fn app_id(&self) -> Option<String> {
        first_child_dir(&self.compatdata_base())
    }
}

/// Name of the first child directory of `dir`, in name order
pub fn first_child_dir(dir: &Path) -> Option<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names.into_iter().next()
}

/// Whether `dir` exists and has at least one entry
pub fn dir_non_empty(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// `~`-prefixed form of `path` when it lives under `home`
pub fn display_path(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rel) if rel.as_os_str().is_empty() => "~".to_string(),
        Ok(rel) => format!("~/{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Backups of `label` under `root`, newest first
///
/// A missing root yields an empty list.
pub fn list_backups(root: &Path, label: &str, home: &Path) -> Vec<BackupEntry> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let prefix = label_prefix(label);

    let mut backups: Vec<BackupEntry> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(&prefix) {
                return None;
            }
            let path = entry.path();
            let size_bytes = dir_size(&path);
            Some(BackupEntry {
                created_at: parse_backup_timestamp(label, &name),
                display_path: display_path(&path, home),
                size_human: humanize(size_bytes),
                size_bytes,
                path,
                name,
            })
        })
        .collect();

    backups.sort_by(|a, b| b.name.cmp(&a.name));
    backups
}

/// Details for `name` under `root`. Never fails; missing parts are empty.
pub fn describe_backup(root: &Path, name: &str) -> BackupDetail {
    let path = root.join(name);
    let layout = SnapshotLayout::new(path.clone());
    BackupDetail {
        name: name.to_string(),
        app_id: layout.app_id().unwrap_or_default(),
        size_human: humanize(dir_size(&path)),
        path,
    }
}

/// Combined size of every backup of `label`
pub fn total_size(root: &Path, label: &str, home: &Path) -> u64 {
    list_backups(root, label, home)
        .iter()
        .map(|entry| entry.size_bytes)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_backup(root: &Path, name: &str, bytes: usize) {
        let dir = root.join(name).join("compatdata").join("42");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("data.bin"), vec![1u8; bytes]).unwrap();
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let temp = TempDir::new().unwrap();
        make_backup(temp.path(), "REPO-20250101-1200", 10);
        make_backup(temp.path(), "REPO-20250301-0900", 10);
        make_backup(temp.path(), "REPO-20250201-2359", 10);

        let names: Vec<String> = list_backups(temp.path(), "REPO", temp.path())
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(
            names,
            vec!["REPO-20250301-0900", "REPO-20250201-2359", "REPO-20250101-1200"]
        );
    }

    #[test]
    fn test_list_filters_prefix_and_files() {
        let temp = TempDir::new().unwrap();
        make_backup(temp.path(), "REPO-20250101-1200", 10);
        make_backup(temp.path(), "OTHER-20250101-1200", 10);
        make_backup(temp.path(), "REPOSITORY-20250101-1200", 10);
        fs::write(temp.path().join("REPO-notes.txt"), "x").unwrap();

        let backups = list_backups(temp.path(), "REPO", temp.path());
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].name, "REPO-20250101-1200");
        assert_eq!(backups[0].size_bytes, 10);
        assert_eq!(backups[0].size_human, "10 B");
        assert!(backups[0].created_at.is_some());
    }

    #[test]
    fn test_list_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(list_backups(&temp.path().join("none"), "REPO", temp.path()).is_empty());
    }

    #[test]
    fn test_display_path() {
        let home = Path::new("/home/u");
        assert_eq!(display_path(Path::new("/home/u/Backups/R-1"), home), "~/Backups/R-1");
        assert_eq!(display_path(Path::new("/mnt/b/R-1"), home), "/mnt/b/R-1");
    }

    #[test]
    fn test_describe_backup() {
        let temp = TempDir::new().unwrap();
        make_backup(temp.path(), "REPO-20250101-1200", 2048);

        let detail = describe_backup(temp.path(), "REPO-20250101-1200");
        assert_eq!(detail.app_id, "42");
        assert_eq!(detail.size_human, "2.0 KiB");
    }

    #[test]
    fn test_describe_missing_backup_is_empty() {
        let temp = TempDir::new().unwrap();
        let detail = describe_backup(temp.path(), "REPO-x");
        assert_eq!(detail.app_id, "");
        assert_eq!(detail.size_human, "0 B");
    }

    #[test]
    fn test_total_size() {
        let temp = TempDir::new().unwrap();
        make_backup(temp.path(), "REPO-20250101-1200", 100);
        make_backup(temp.path(), "REPO-20250102-1200", 200);
        make_backup(temp.path(), "OTHER-20250102-1200", 400);

        assert_eq!(total_size(temp.path(), "REPO", temp.path()), 300);
    }

    #[test]
    fn test_dir_non_empty() {
        let temp = TempDir::new().unwrap();
        assert!(!dir_non_empty(&temp.path().join("missing")));
        assert!(!dir_non_empty(temp.path()));
        fs::write(temp.path().join("f"), "x").unwrap();
        assert!(dir_non_empty(temp.path()));
    }
}
