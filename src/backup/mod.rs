//! Backup lifecycle engine
//!
//! Creates, restores, renames and deletes snapshots of the game's Steam data.
//!
//! # Architecture
//!
//! - `BackupManager`: owns the configuration, the copy backend and the runtime
//!   control; every operation rediscovers the environment from scratch
//! - `manager`: listing, create, delete, rename and open
//! - `restore`: restore with rename-aside of the live trees
//!
//! # Safety
//!
//! Every caller-supplied name is checked with [`crate::safety::contained_join`]
//! before it reaches the filesystem. Restore never overwrites a live tree in
//! place: existing trees are renamed to `<path>.bak-YYYYMMDD-HHMM` first and
//! are never pruned automatically.
//!
//! Operations are not serialized. Callers that can run two at once must hold a
//! lock around the manager.
//!
//! # Example
//!
//! ```rust,ignore
//! use repo_backup::backup::BackupManager;
//! use repo_backup::config::{AppPaths, Settings};
//!
//! let paths = AppPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let manager = BackupManager::from_settings(&settings, &paths);
//!
//! let created = manager.create_backup("REPO")?;
//! println!("{}: {}", created.name, created.report.summary());
//! ```

mod manager;
mod restore;

#[cfg(test)]
pub(crate) mod testutil;

use serde::Serialize;

use crate::copy::TransferSummary;

pub use manager::{find_save_tree, BackupManager, CreateResult};
pub use restore::RestoreResult;

/// Per-tree outcome lines of one operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationReport {
    pieces: Vec<String>,
}

impl OperationReport {
    /// Record a copy; an absent source leaves no line
    pub fn record_copy(&mut self, tree: &str, summary: Option<TransferSummary>) {
        if let Some(summary) = summary {
            self.pieces.push(format!("{}: {}", tree, summary));
        }
    }

    /// Record a tree that was not copied, with the reason
    pub fn record_marker(&mut self, tree: &str, marker: &str) {
        self.pieces.push(format!("{}: ({})", tree, marker));
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    /// Pipe-separated one-line summary
    pub fn summary(&self) -> String {
        self.pieces.join(" | ")
    }
}
