//! Custom error types for repo-backup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// A caller-supplied name resolves outside the backups root
    #[error("Path violation: {} is not inside {}", .candidate.display(), .root.display())]
    PathViolation { root: PathBuf, candidate: PathBuf },

    /// Discovery exhausted all fallbacks
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A snapshot lacks the data needed to restore it
    #[error("Backup is missing data: {0}")]
    MissingData(String),

    /// The snapshot has no compatdata, userdata or saves tree
    #[error("Backup is empty (no compatdata/userdata/saves): {0}")]
    EmptyBackup(String),

    /// Rename target collision
    #[error("A backup with that name already exists: {0}")]
    AlreadyExists(String),

    /// The `.bak-<stamp>` sibling a live tree would be moved to is taken
    #[error("Cannot move live data aside: {} already exists", .0.display())]
    AsideExists(PathBuf),

    /// A backup name does not follow the naming rules
    #[error("Invalid backup name: {0}")]
    InvalidName(String),

    /// The tree copy backend reported a failure
    #[error("Failed to copy {tree}: {message}")]
    CopyFailed { tree: &'static str, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BackupError {
    /// Create a path violation error for a candidate under a root
    pub fn path_violation(root: &Path, candidate: &Path) -> Self {
        Self::PathViolation {
            root: root.to_path_buf(),
            candidate: candidate.to_path_buf(),
        }
    }

    /// Create a "not found" error for profiles
    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Profile",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Wrap a copy failure with the tree that was being copied
    pub fn copy_failed(tree: &'static str, message: impl Into<String>) -> Self {
        Self::CopyFailed {
            tree,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a rename-aside collision
    pub fn is_aside_collision(&self) -> bool {
        matches!(self, Self::AsideExists(_))
    }

    /// Check if this is a path violation
    pub fn is_path_violation(&self) -> bool {
        matches!(self, Self::PathViolation { .. })
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;
