use crate::{
    commands::Session,
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show current database version
    Status,
    /// Show migration history
    History,
    /// Apply pending migrations now
    Run,
    /// Forget migrations above a version (debug builds)
    #[cfg(debug_assertions)]
    Rollback {
        /// Version to go back to
        version: u32,
    },
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let config = Config::read()?;
    #[allow(unused_mut)]
    let mut db = Db::open_without_migrations(config.db_path()?)?;

    match args.command {
        MigrationsCommand::Status => {
            msg_print!(Message::DatabaseVersion(get_db_version(&db.conn)?));
            if needs_migration(&db.conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&db.conn)?;
            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                msg_print!(Message::MigrationHistoryEntry(version, name, applied_at));
            }
        }
        MigrationsCommand::Run => {
            drop(db);
            let session = Session::open()?;
            msg_print!(Message::DatabaseVersion(get_db_version(&session.db.conn)?));
        }
        #[cfg(debug_assertions)]
        MigrationsCommand::Rollback { version } => {
            MigrationManager::new().rollback_to(&mut db.conn, version)?;
        }
    }
    Ok(())
}
