use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use repo_backup::backup::BackupManager;
use repo_backup::cli::{handle_backup_command, logger, BackupCommands};
use repo_backup::config::{AppPaths, Settings};

#[derive(Parser)]
#[command(
    name = "repo-backup",
    version,
    about = "Snapshot and restore R.E.P.O. save data from Steam/Proton",
    long_about = "repo-backup stops Steam, copies the game's compatdata, userdata and \
                  save folder into a dated directory under your backups root, and can \
                  put any of those snapshots back later. Live data is never overwritten \
                  in place: it is moved aside to a .bak-<timestamp> sibling first."
)]
struct Cli {
    /// Directory holding the backups (overrides config.json)
    #[arg(long, global = true, env = "REPO_BACKUP_ROOT", value_name = "DIR")]
    backups_root: Option<PathBuf>,

    /// Backup name prefix (overrides config.json)
    #[arg(long, global = true)]
    label: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG [default: warn]
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Backup(BackupCommands),

    /// Show current configuration and paths
    Config {
        /// Write the current settings to config.json
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level.as_deref())?;

    let paths = AppPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(root) = cli.backups_root {
        settings.backups_root = Some(root);
    }
    if let Some(label) = cli.label {
        settings.label = label;
    }
    settings.validate()?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            let manager = BackupManager::from_settings(&settings, &paths);
            handle_backup_command(&manager, &settings.label, cmd)?;
        }
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to {}", paths.settings_file().display());
                println!();
            }
            println!("repo-backup Configuration");
            println!("=========================");
            println!("Settings file: {}", paths.settings_file().display());
            println!("Backups root:  {}", settings.backups_root(&paths).display());
            println!("Steam roots:");
            for root in settings.runtime_roots(&paths) {
                println!("  {}", root.display());
            }
            println!();
            println!("Settings:");
            println!("  Label:       {}", settings.label);
            println!("  Game name:   {}", settings.app_name);
            println!("  Fallback id: {}", settings.fallback_app_id);
            println!("  Copier:      {:?}", settings.copier);
        }
        None => {
            println!("repo-backup - snapshot and restore game save data");
            println!();
            println!("Run 'repo-backup --help' for usage information.");
            println!("Run 'repo-backup list' to see your backups.");
        }
    }

    Ok(())
}
