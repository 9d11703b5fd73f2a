//! repo-backup - point-in-time snapshots of a Steam/Proton game's save state
//!
//! The game's state is spread over three trees owned by Steam: the Proton
//! compatdata prefix, the per-profile userdata directory and the save folder
//! inside the Wine prefix. None of their locations are fixed, so each
//! operation rediscovers them before copying anything.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `safety`: Path containment checks for caller-supplied names
//! - `discovery`: Steam root, app id and profile id discovery; Steam shutdown
//! - `snapshot`: On-disk backup layout, listing and sizes
//! - `copy`: Tree copy backends (rsync and built-in)
//! - `backup`: The create/restore/delete/rename engine
//! - `cli`: Command-line handlers
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
//! for entry in manager.list_backups(&settings.label) {
//!     println!("{} {}", entry.name, entry.size_human);
//! }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod copy;
pub mod discovery;
pub mod error;
pub mod safety;
pub mod snapshot;

pub use error::{BackupError, BackupResult};
