//! List layout remembered between runs (`ui_state.json`).

use super::data_storage::DataStorage;
use super::view::Column;
use crate::db::equipments::InventoryFilter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

pub const VIEW_SETTINGS_FILE: &str = "ui_state.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewSettings {
    pub columns: Vec<Column>,
    pub default_filter: InventoryFilter,
    pub sort_column: Option<Column>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings {
            columns: Column::DEFAULT.to_vec(),
            default_filter: InventoryFilter::In,
            sort_column: None,
        }
    }
}

impl ViewSettings {
    /// Falls back to the defaults when the file is missing or unreadable.
    pub fn read() -> Self {
        match DataStorage::new().get_path(VIEW_SETTINGS_FILE) {
            Ok(path) => Self::read_from(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn read_from(path: &Path) -> Self {
        let Ok(raw) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<ViewSettings>(&raw) {
            Ok(settings) if !settings.columns.is_empty() => settings,
            Ok(settings) => ViewSettings {
                columns: Column::DEFAULT.to_vec(),
                ..settings
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable view settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new().get_path(VIEW_SETTINGS_FILE)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        serde_json::to_writer_pretty(File::create(path)?, self)?;
        Ok(())
    }
}
