//! Database snapshots.
//!
//! Restoring never runs with the store open: the path comes from the config
//! and no [`Db`](crate::db::db::Db) handle exists while the file is swapped.

use super::confirm;
use crate::{
    libs::{
        backup::{create_backup, list_backups, restore_backup},
        background::Background,
        config::Config,
        messages::Message,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Snapshot the database into the backup directory
    Create,
    /// List snapshots, newest first
    List,
    /// Replace the database with a snapshot
    Restore {
        /// Snapshot file
        file: PathBuf,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: BackupArgs) -> Result<()> {
    let config = Config::read()?;
    let db_path = config.db_path()?;

    match args.command {
        BackupCommand::Create => {
            let backup_dir = config.backup_path();
            let written = Background::new()
                .run("Backup", move || Ok(create_backup(&db_path, &backup_dir)?.display().to_string()))
                .await?;
            msg_success!(Message::BackupCreated(written));
        }
        BackupCommand::List => {
            let snapshots = list_backups(&config.backup_path())?;
            if snapshots.is_empty() {
                msg_info!(Message::NoBackupsFound);
            } else {
                msg_print!(Message::BackupsHeader);
                for snapshot in snapshots {
                    println!("  {}", snapshot.display());
                }
            }
        }
        BackupCommand::Restore { file, yes } => {
            if !confirm(Message::ConfirmRestore(file.display().to_string()), yes)? {
                return Ok(());
            }
            restore_backup(&file, &db_path)?;
            msg_success!(Message::BackupRestored(file.display().to_string()));
        }
    }
    Ok(())
}
