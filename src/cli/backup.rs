//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::BackupManager;
use crate::error::{BackupError, BackupResult};
use crate::snapshot::{humanize, BackupEntry};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// List all backups, newest first
    #[command(alias = "ls")]
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a backup
    Info {
        /// Backup name (defaults to the newest; 'latest' also works)
        backup: Option<String>,
    },

    /// Stop Steam and snapshot the current game data
    Create,

    /// Replace the live game data with a backup
    Restore {
        /// Backup name (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Permanently delete a backup
    #[command(alias = "rm")]
    Delete {
        /// Backup name
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Rename a backup (the new name must keep the label prefix)
    #[command(alias = "mv")]
    Rename {
        /// Current backup name
        old: String,
        /// New backup name
        new: String,
    },

    /// Reveal a backup in the file manager
    Open {
        /// Backup name
        backup: String,
    },

    /// Show the combined size of all backups
    Size,
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl BackupRow {
    fn new(index: usize, entry: &BackupEntry) -> Self {
        let age = entry
            .created_at
            .map(|created| {
                let now = chrono::Local::now().naive_local();
                format_duration(now.signed_duration_since(created))
            })
            .unwrap_or_else(|| "-".to_string());

        Self {
            index,
            name: entry.name.clone(),
            age,
            size: entry.size_human.clone(),
            location: entry.display_path.clone(),
        }
    }
}

/// Handle a backup command
pub fn handle_backup_command(
    manager: &BackupManager,
    label: &str,
    cmd: BackupCommands,
) -> BackupResult<()> {
    match cmd {
        BackupCommands::List { json } => {
            let backups = manager.list_backups(label);

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found in {}.", manager.backups_root().display());
                println!("Create one with: repo-backup create");
                return Ok(());
            }

            let rows: Vec<BackupRow> = backups
                .iter()
                .enumerate()
                .map(|(i, entry)| BackupRow::new(i + 1, entry))
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()).to_string());

            let total: u64 = backups.iter().map(|b| b.size_bytes).sum();
            println!("Total: {} backup(s), {}", backups.len(), humanize(total));
        }

        BackupCommands::Info { backup } => {
            let name = match backup {
                Some(name) => resolve_backup_name(manager, label, &name)?,
                None => resolve_backup_name(manager, label, "latest")?,
            };
            let detail = manager.describe_backup(&name);

            println!("Backup Details");
            println!("==============");
            println!("Name:   {}", detail.name);
            println!("Path:   {}", detail.path.display());
            println!(
                "App ID: {}",
                if detail.app_id.is_empty() {
                    "(unknown)"
                } else {
                    &detail.app_id
                }
            );
            println!("Size:   {}", detail.size_human);
        }

        BackupCommands::Create => {
            println!("Stopping Steam and creating backup...");
            let created = manager.create_backup(label)?;
            println!("Backup created: {}", created.name);
            println!("Location: {}", created.path.display());
            let summary = created.report.summary();
            if !summary.is_empty() {
                println!("{}", summary);
            }
        }

        BackupCommands::Restore { backup, force } => {
            let name = resolve_backup_name(manager, label, &backup)?;
            let detail = manager.describe_backup(&name);

            println!("Backup Information");
            println!("==================");
            println!("Name:   {}", detail.name);
            println!("App ID: {}", detail.app_id);
            println!("Size:   {}", detail.size_human);
            println!();

            if !force {
                println!("WARNING: This will stop Steam and replace the live game data!");
                println!("Current data is kept next to it with a .bak-<timestamp> suffix.");
                println!("To proceed, run again with --force flag:");
                println!("  repo-backup restore {} --force", backup);
                return Ok(());
            }

            println!("Restoring from backup...");
            let result = manager.restore_backup(&name)?;

            println!("Restore complete!");
            let summary = result.report.summary();
            if !summary.is_empty() {
                println!("{}", summary);
            }
            for aside in &result.set_aside {
                println!("Previous data kept at: {}", aside.display());
            }
        }

        BackupCommands::Delete { backup, force } => {
            if !force {
                manager.backup_path(&backup)?;
                let detail = manager.describe_backup(&backup);
                println!("About to delete {} ({})", detail.name, detail.size_human);
                println!("To proceed, run again with --force flag:");
                println!("  repo-backup delete {} --force", backup);
                return Ok(());
            }

            manager.delete_backup(&backup)?;
            println!("Deleted {}", backup);
        }

        BackupCommands::Rename { old, new } => {
            manager.rename_backup(&old, &new, label)?;
            println!("Renamed {} -> {}", old, new);
        }

        BackupCommands::Open { backup } => {
            manager.open_backup(&backup)?;
        }

        BackupCommands::Size => {
            let total = manager.total_size(label);
            println!("{} ({} bytes)", humanize(total), total);
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a backup name
fn resolve_backup_name(manager: &BackupManager, label: &str, backup: &str) -> BackupResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup(label)
            .map(|b| b.name)
            .ok_or_else(|| BackupError::backup_not_found("latest"));
    }

    let path = manager.backup_path(backup)?;
    if path.is_dir() {
        Ok(backup.to_string())
    } else {
        Err(BackupError::backup_not_found(backup))
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}
