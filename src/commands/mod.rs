//! Command-line surface.
//!
//! Every subcommand lives in its own module with an `Args` struct and a
//! `cmd` entry point. [`Cli::menu`] parses the arguments and dispatches.

pub mod attach;
pub mod backup;
pub mod close;
pub mod destination;
pub mod exit;
pub mod export;
pub mod final_doc;
pub mod init;
pub mod list;
pub mod log;
pub mod migrations;
pub mod new;
pub mod notify;
pub mod open;
pub mod reopen;
pub mod report;
pub mod show;
pub mod stats;
pub mod voucher;
pub mod work;

use crate::db::db::{Db, StoreError};
use crate::libs::backup::BackupError;
use crate::libs::config::Config;
use crate::libs::filing::FilingError;
use crate::libs::lifecycle::TransitionError;
use crate::libs::messages::Message;
use crate::libs::validators::ValidationError;
use crate::libs::workshop::Workshop;
use crate::{msg_error, msg_info};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Register a unit arriving at the workshop")]
    New(new::NewArgs),
    #[command(about = "List equipment records")]
    List(list::ListArgs),
    #[command(about = "Show every detail of one record")]
    Show(show::ShowArgs),
    #[command(about = "Record the exit condition and work remarks")]
    Work(work::WorkArgs),
    #[command(about = "Append an intervention to the history")]
    Log(log::LogArgs),
    #[command(about = "File photos or scans for a record")]
    Attach(attach::AttachArgs),
    #[command(name = "final-doc", about = "File the CAT certificate or the final defect report")]
    FinalDoc(final_doc::FinalDocArgs),
    #[command(about = "Mark the return voucher as available or missing")]
    Voucher(voucher::VoucherArgs),
    #[command(about = "Close a record")]
    Close(close::CloseArgs),
    #[command(about = "Change the destination of a closed Repairable unit")]
    Destination(destination::DestinationArgs),
    #[command(about = "Reopen a closed record")]
    Reopen(reopen::ReopenArgs),
    #[command(about = "Release a closed unit from the inventory")]
    Exit(exit::ExitArgs),
    #[command(about = "Send a closure notice or a material request")]
    Notify(notify::NotifyArgs),
    #[command(about = "Open a filed document")]
    Open(open::OpenArgs),
    #[command(about = "Export the current list to CSV or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Write the PDF inventory report")]
    Report(report::ReportArgs),
    #[command(about = "Chart closed units still in the inventory")]
    Stats,
    #[command(about = "Create, list or restore database backups")]
    Backup(backup::BackupArgs),
    #[command(about = "Database schema status")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::New(args) => new::cmd(args),
            Commands::List(args) => list::cmd(args),
            Commands::Show(args) => show::cmd(args),
            Commands::Work(args) => work::cmd(args),
            Commands::Log(args) => log::cmd(args),
            Commands::Attach(args) => attach::cmd(args),
            Commands::FinalDoc(args) => final_doc::cmd(args),
            Commands::Voucher(args) => voucher::cmd(args),
            Commands::Close(args) => close::cmd(args),
            Commands::Destination(args) => destination::cmd(args),
            Commands::Reopen(args) => reopen::cmd(args),
            Commands::Exit(args) => exit::cmd(args),
            Commands::Notify(args) => notify::cmd(args),
            Commands::Open(args) => open::cmd(args),
            Commands::Export(args) => export::cmd(args).await,
            Commands::Report(args) => report::cmd(args).await,
            Commands::Stats => stats::cmd(),
            Commands::Backup(args) => backup::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Configuration plus an open store, shared by the record commands.
pub struct Session {
    pub config: Config,
    pub db: Db,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::read()?;
        let db = Db::open(config.db_path()?)?;
        Ok(Self { config, db })
    }

    pub fn workshop(&self) -> Workshop<'_> {
        Workshop::new(&self.db, &self.config)
    }
}

/// Asks before a destructive step; `assume_yes` skips the prompt.
pub fn confirm(question: Message, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let accepted = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(question.to_string())
        .default(false)
        .interact()?;
    if !accepted {
        msg_info!(Message::OperationCancelled);
    }
    Ok(accepted)
}

/// Operator-facing text for the typed errors raised below the command layer.
/// `None` means the error was already reported where it happened.
fn describe(error: &anyhow::Error) -> Option<String> {
    if let Some(e) = error.downcast_ref::<TransitionError>() {
        let message = match e {
            TransitionError::Invalid(invalid) => Message::ValidationFailed(invalid.to_string()),
            TransitionError::DuplicateOrder(order) => Message::DuplicateOrder(order.clone()),
            other => Message::TransitionRefused(other.to_string()),
        };
        return Some(message.to_string());
    }
    if let Some(e) = error.downcast_ref::<ValidationError>() {
        return Some(Message::ValidationFailed(e.to_string()).to_string());
    }
    if let Some(e) = error.downcast_ref::<StoreError>() {
        return match e {
            StoreError::Duplicate(column) => Some(Message::DuplicateValue(column.clone()).to_string()),
            StoreError::NotFound(id) => Some(Message::EquipmentNotFound(*id).to_string()),
            StoreError::Sqlite { .. } => None,
        };
    }
    if let Some(e) = error.downcast_ref::<FilingError>() {
        let message = match e {
            FilingError::MissingSource(path) => Message::FileMissing(path.display().to_string()),
            FilingError::TooLarge { path, max, .. } => Message::FileTooLarge(path.display().to_string(), max / (1024 * 1024)),
            FilingError::PermissionDenied(path) => Message::FilePermissionDenied(path.display().to_string()),
            FilingError::Io { source, .. } => Message::FileCopyFailed(source.to_string()),
        };
        return Some(message.to_string());
    }
    if let Some(e) = error.downcast_ref::<BackupError>() {
        return Some(e.to_string());
    }
    Some(format!("{:#}", error))
}

/// Prints a failed command's error once and logs the full chain.
pub fn report_error(error: &anyhow::Error) {
    tracing::error!(error = ?error, "command failed");
    if let Some(text) = describe(error) {
        // Errors built with msg_bail_anyhow! already carry their marker
        match text.strip_prefix("❌ ") {
            Some(stripped) => msg_error!(stripped),
            None => msg_error!(text),
        }
    }
}
