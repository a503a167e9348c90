//! Application configuration stored as `config.json` in the data directory.
//!
//! Every field has a default, so a missing or partial file still yields a
//! usable configuration. Relative paths are resolved against the data
//! directory. SMTP settings may also come from the environment (or a `.env`
//! file); the environment wins over the file.

use super::data_storage::DataStorage;
use super::lifecycle::ExitPolicy;
use super::validators::DEFAULT_MAX_FILE_MB;
use crate::db::db::DB_FILE_NAME;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTransport {
    /// Pre-filled webmail compose page in the default browser
    #[default]
    Web,
    /// Direct delivery through the configured SMTP relay
    Smtp,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub recipient: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        SmtpConfig {
            server: "smtp.gmail.com".to_string(),
            port: 587,
            user: String::new(),
            from: None,
            recipient: String::new(),
        }
    }
}

impl SmtpConfig {
    pub fn is_complete(&self) -> bool {
        !self.server.trim().is_empty() && !self.user.trim().is_empty() && !self.recipient.trim().is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub company_name: String,
    pub db_file: PathBuf,
    pub docs_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub max_file_mb: u64,
    pub exit_policy: ExitPolicy,
    pub notify_transport: NotifyTransport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            company_name: "AvionicaTaller".to_string(),
            db_file: PathBuf::from(DB_FILE_NAME),
            docs_dir: PathBuf::from("docs"),
            backup_dir: PathBuf::from("backups"),
            log_file: PathBuf::from("eqtrack.log"),
            log_level: "debug".to_string(),
            max_file_mb: DEFAULT_MAX_FILE_MB,
            exit_policy: ExitPolicy::default(),
            notify_transport: NotifyTransport::default(),
            smtp: None,
        }
    }
}

impl Config {
    pub fn read() -> Result<Config> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let mut config = Self::read_from(&path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Reads a config file; a missing file yields the defaults.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// `SMTP_SERVER`, `SMTP_PORT`, `SMTP_USER`, `SMTP_FROM` and
    /// `EMAIL_RECIPIENT` override the file.
    pub fn apply_env_overrides(&mut self) {
        let server = env::var("SMTP_SERVER").ok();
        let port = env::var("SMTP_PORT").ok().and_then(|p| p.trim().parse::<u16>().ok());
        let user = env::var("SMTP_USER").ok();
        let from = env::var("SMTP_FROM").ok();
        let recipient = env::var("EMAIL_RECIPIENT").ok();

        if server.is_none() && port.is_none() && user.is_none() && from.is_none() && recipient.is_none() {
            return;
        }

        let smtp = self.smtp.get_or_insert_with(SmtpConfig::default);
        if let Some(server) = server {
            smtp.server = server;
        }
        if let Some(port) = port {
            smtp.port = port;
        }
        if let Some(user) = user {
            smtp.user = user;
        }
        if from.is_some() {
            smtp.from = from;
        }
        if let Some(recipient) = recipient {
            smtp.recipient = recipient;
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        DataStorage::new().resolve(path)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.resolve(&self.db_file))
    }

    pub fn docs_path(&self) -> PathBuf {
        self.resolve(&self.docs_dir)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.resolve(&self.backup_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    /// Interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let sections = [Message::ConfigModulePaths, Message::ConfigModulePolicy, Message::ConfigModuleSmtp];
        let selected = MultiSelect::with_theme(&theme)
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&sections.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .interact()?;

        for index in selected {
            match index {
                0 => {
                    msg_print!(Message::ConfigModulePaths);
                    config.company_name = Input::with_theme(&theme)
                        .with_prompt(Message::PromptCompanyName.to_string())
                        .default(config.company_name.clone())
                        .interact_text()?;
                    let docs: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptDocsDir.to_string())
                        .default(config.docs_dir.display().to_string())
                        .interact_text()?;
                    config.docs_dir = PathBuf::from(docs);
                    let backups: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptBackupDir.to_string())
                        .default(config.backup_dir.display().to_string())
                        .interact_text()?;
                    config.backup_dir = PathBuf::from(backups);
                    config.max_file_mb = Input::with_theme(&theme)
                        .with_prompt(Message::PromptMaxFileMb.to_string())
                        .default(config.max_file_mb)
                        .interact_text()?;
                }
                1 => {
                    msg_print!(Message::ConfigModulePolicy);
                    let options = ["Condition specific (certificate / final DR only)", "Strict (any final document)"];
                    let current = if config.exit_policy == ExitPolicy::Strict { 1 } else { 0 };
                    let choice = Select::with_theme(&theme)
                        .with_prompt(Message::PromptExitPolicy.to_string())
                        .items(&options)
                        .default(current)
                        .interact()?;
                    config.exit_policy = if choice == 1 { ExitPolicy::Strict } else { ExitPolicy::ConditionSpecific };
                }
                2 => {
                    msg_print!(Message::ConfigModuleSmtp);
                    let options = ["Webmail compose page", "SMTP"];
                    let current = if config.notify_transport == NotifyTransport::Smtp { 1 } else { 0 };
                    let choice = Select::with_theme(&theme)
                        .with_prompt(Message::PromptNotifyTransport.to_string())
                        .items(&options)
                        .default(current)
                        .interact()?;
                    config.notify_transport = if choice == 1 { NotifyTransport::Smtp } else { NotifyTransport::Web };

                    if config.notify_transport == NotifyTransport::Smtp {
                        let default = config.smtp.clone().unwrap_or_default();
                        let from: String = Input::with_theme(&theme)
                            .with_prompt(Message::PromptSmtpFrom.to_string())
                            .default(default.from.clone().unwrap_or_default())
                            .allow_empty(true)
                            .interact_text()?;
                        config.smtp = Some(SmtpConfig {
                            server: Input::with_theme(&theme)
                                .with_prompt(Message::PromptSmtpServer.to_string())
                                .default(default.server)
                                .interact_text()?,
                            port: Input::with_theme(&theme)
                                .with_prompt(Message::PromptSmtpPort.to_string())
                                .default(default.port)
                                .interact_text()?,
                            user: Input::with_theme(&theme)
                                .with_prompt(Message::PromptSmtpUser.to_string())
                                .default(default.user)
                                .interact_text()?,
                            from: Some(from).filter(|f| !f.trim().is_empty()),
                            recipient: Input::with_theme(&theme)
                                .with_prompt(Message::PromptSmtpRecipient.to_string())
                                .default(default.recipient)
                                .interact_text()?,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
