//! Tree copy gateway
//!
//! The engine only needs "copy tree A into tree B and tell me what moved".
//! Two backends implement it:
//!
//! - `RsyncCopier`: shells out to `rsync -aH`, keeping metadata and hard links
//! - `NativeCopier`: a built-in recursive copy for hosts without rsync

pub mod native;
pub mod rsync;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::CopierKind;
use crate::error::BackupResult;
use crate::snapshot::humanize;

pub use native::NativeCopier;
pub use rsync::RsyncCopier;

/// What a single tree copy transferred
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// Files that did not exist at the destination before
    pub created_files: u64,
    /// Regular files written
    pub transferred_files: u64,
    /// Bytes of file content written
    pub transferred_bytes: u64,
}

impl fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created files: {} / transferred files: {} / transferred size: {}",
            self.created_files,
            self.transferred_files,
            humanize(self.transferred_bytes)
        )
    }
}

/// Copies one directory tree onto another
pub trait TreeCopier {
    /// Copy the contents of `source` into `dest`, creating `dest` and its parents
    ///
    /// Returns `Ok(None)` without touching anything when `source` does not exist.
    fn copy_tree(&self, source: &Path, dest: &Path) -> BackupResult<Option<TransferSummary>>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Build the copier selected in settings
pub fn make_copier(kind: CopierKind) -> Box<dyn TreeCopier> {
    let copier: Box<dyn TreeCopier> = match kind {
        CopierKind::Rsync => Box::new(RsyncCopier::new()),
        CopierKind::Native => Box::new(NativeCopier::new()),
        CopierKind::Auto => {
            if RsyncCopier::is_available() {
                Box::new(RsyncCopier::new())
            } else {
                Box::new(NativeCopier::new())
            }
        }
    };
    info!(backend = copier.name(), "Selected copy backend");
    copier
}
