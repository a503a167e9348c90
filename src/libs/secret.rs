//! SMTP password kept encrypted next to the configuration.
//!
//! The password never goes into `config.json`. It is read from
//! `SMTP_PASSWORD` when set, otherwise from an AES-256-CBC encrypted,
//! base64 encoded file whose key and IV are embedded at build time.

use super::data_storage::DataStorage;
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::env;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

pub const SMTP_SECRET_FILE: &str = ".smtp_secret";
pub const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";

#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl Secret {
    pub fn new(secret_name: &str, prompt: &str) -> Self {
        let secret_file_path = DataStorage::new().get_path(secret_name).unwrap_or_else(|_| PathBuf::from(secret_name));
        Self::with_path(secret_file_path, prompt)
    }

    pub fn with_path(secret_file_path: impl Into<PathBuf>, prompt: &str) -> Self {
        Self {
            prompt: prompt.to_owned(),
            secret_file_path: secret_file_path.into(),
            key: APP_METADATA_ENCRYPTION_KEY.to_vec(),
            iv: APP_METADATA_ENCRYPTION_IV.to_vec(),
        }
    }

    /// Secret holding the SMTP password.
    pub fn smtp(prompt: &str) -> Self {
        Self::new(SMTP_SECRET_FILE, prompt)
    }

    pub fn path(&self) -> &Path {
        &self.secret_file_path
    }

    /// Environment first, then the encrypted file.
    pub fn get(&self) -> Option<String> {
        if let Ok(password) = env::var(SMTP_PASSWORD_ENV) {
            if !password.is_empty() {
                return Some(password);
            }
        }
        if !self.secret_file_path.exists() {
            return None;
        }
        match self.decrypt() {
            Ok(password) => Some(password),
            Err(e) => {
                tracing::warn!(path = %self.secret_file_path.display(), error = %e, "stored secret unreadable");
                None
            }
        }
    }

    pub fn get_or_prompt(&self) -> Result<String> {
        match self.get() {
            Some(password) => Ok(password),
            None => self.prompt(),
        }
    }

    pub fn prompt(&self) -> Result<String> {
        let password = Password::with_theme(&ColorfulTheme::default()).with_prompt(&self.prompt).interact()?;
        self.store(&password)?;
        Ok(password)
    }

    pub fn store(&self, password: &str) -> Result<()> {
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let ciphertext = cipher.encrypt_vec(password.as_bytes());
        let encoded = BASE64_STANDARD.encode(&ciphertext);

        if let Some(parent) = self.secret_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&self.secret_file_path)?;
        file.write_all(encoded.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.secret_file_path.exists() {
            fs::remove_file(&self.secret_file_path)?;
        }
        Ok(())
    }

    fn decrypt(&self) -> Result<String> {
        let mut file = File::open(&self.secret_file_path)?;
        let mut encoded = String::new();
        file.read_to_string(&mut encoded)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let decrypted = cipher.decrypt_vec(&ciphertext)?;
        Ok(String::from_utf8(decrypted)?)
    }
}
