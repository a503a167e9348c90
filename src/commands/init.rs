//! Application configuration initialization command.
//!
//! Runs the interactive setup wizard. When SMTP delivery is chosen the
//! password is asked for once and stored encrypted next to the config.

use crate::{
    libs::{
        config::{Config, NotifyTransport, CONFIG_FILE_NAME},
        data_storage::DataStorage,
        messages::Message,
        secret::Secret,
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the existing configuration and stored SMTP password
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let secret = Secret::smtp(&Message::PromptSmtpPassword.to_string());

    if init_args.delete {
        let config_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_path.exists() {
            fs::remove_file(&config_path)?;
        }
        secret.clear()?;
        tracing::info!(path = %config_path.display(), "configuration removed");
        msg_success!(Message::ConfigDeleted);
        return Ok(());
    }

    let config = Config::init()?;
    config.save()?;

    if config.notify_transport == NotifyTransport::Smtp && secret.get().is_none() {
        secret.prompt()?;
    }

    msg_success!(Message::ConfigSaved);
    Ok(())
}
