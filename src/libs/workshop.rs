//! Bench operations on equipment records.
//!
//! Each operation validates against [`lifecycle`](super::lifecycle) before
//! touching anything, then files documents, then writes the row. When the
//! row write fails after a file was copied, the copy is removed again so the
//! docs tree never holds files no record points to.

use super::config::Config;
use super::equipment::{is_image, AttachmentKind, CloseInput, Closure, Equipment, ExitCondition, FinalDocument, NewEquipment};
use super::filing::{copy_document, record_folder, remove_filed};
use super::formatter::now_stamp;
use super::lifecycle::{self, ExitPolicy};
use super::messages::Message;
use crate::db::db::{Db, StoreError};
use crate::db::equipments::Equipments;
use crate::{msg_bail_anyhow, msg_warning};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct Workshop<'a> {
    db: &'a Db,
    docs_dir: PathBuf,
    max_file_mb: u64,
    exit_policy: ExitPolicy,
}

impl<'a> Workshop<'a> {
    pub fn new(db: &'a Db, config: &Config) -> Self {
        Self::with_settings(db, config.docs_path(), config.max_file_mb, config.exit_policy)
    }

    pub fn with_settings(db: &'a Db, docs_dir: impl Into<PathBuf>, max_file_mb: u64, exit_policy: ExitPolicy) -> Self {
        Self {
            db,
            docs_dir: docs_dir.into(),
            max_file_mb,
            exit_policy,
        }
    }

    fn equipments(&self) -> Equipments<'a> {
        Equipments::new(self.db)
    }

    pub fn get(&self, id: i64) -> Result<Equipment> {
        Ok(self.equipments().require(id)?)
    }

    /// Folder of an existing record; rebuilt from its keys for rows stored
    /// before folders were recorded.
    fn folder_of(&self, record: &Equipment) -> Result<PathBuf> {
        if let Some(folder) = &record.folder {
            return Ok(PathBuf::from(folder));
        }
        let earlier = self.equipments().count_arisings(&record.part_number, &record.serial_number, Some(record.id))?;
        Ok(record_folder(&self.docs_dir, &record.name, &record.serial_number, earlier))
    }

    /// Runs `write` with a freshly filed copy of `source`, removing the copy
    /// when the write fails.
    fn file_then<T>(&self, source: &Path, target_dir: &Path, write: impl FnOnce(&Path) -> Result<T, StoreError>) -> Result<(PathBuf, T)> {
        let filed = copy_document(source, target_dir, self.max_file_mb)?;
        match write(&filed) {
            Ok(value) => Ok((filed, value)),
            Err(e) => {
                compensate(&filed);
                Err(e.into())
            }
        }
    }

    /// Entry form: validates, files the entry document under the next
    /// arising folder and inserts the row.
    pub fn register(&self, input: &NewEquipment, entry_document: Option<&Path>) -> Result<Equipment> {
        let equipments = self.equipments();
        let order_taken = equipments.order_exists(input.order_number.trim(), None)?;
        let input = lifecycle::check_entry(input, order_taken)?;

        let sequence = equipments.count_arisings(&input.part_number, &input.serial_number, None)?;
        let folder = record_folder(&self.docs_dir, &input.name, &input.serial_number, sequence);
        let entry_date = now_stamp();

        let id = match entry_document {
            Some(source) => {
                let (_, id) = self.file_then(source, &folder, |filed| equipments.insert(&input, &entry_date, Some(filed), &folder))?;
                id
            }
            None => equipments.insert(&input, &entry_date, None, &folder)?,
        };

        tracing::info!(id, order = %input.order_number, folder = %folder.display(), "equipment registered");
        Ok(equipments.require(id)?)
    }

    pub fn update_work(&self, id: i64, exit_condition: Option<ExitCondition>, exit_remarks: Option<&str>) -> Result<()> {
        let record = self.get(id)?;
        lifecycle::check_work_update(&record)?;
        let exit_remarks = exit_remarks.map(str::trim).filter(|r| !r.is_empty());
        if exit_condition.is_none() && exit_remarks.is_none() {
            msg_bail_anyhow!(Message::NothingToUpdate);
        }
        self.equipments().update_work(id, exit_condition, exit_remarks)?;
        Ok(())
    }

    pub fn add_intervention(&self, id: i64, text: &str) -> Result<i64> {
        let record = self.get(id)?;
        lifecycle::check_work_update(&record)?;
        let text = text.trim();
        if text.is_empty() {
            msg_bail_anyhow!(Message::EmptyIntervention);
        }
        Ok(self.equipments().append_intervention(id, &now_stamp(), text)?)
    }

    /// Files a photo or scan into the record folder.
    pub fn attach(&self, id: i64, source: &Path, kind: AttachmentKind) -> Result<PathBuf> {
        let record = self.get(id)?;
        lifecycle::check_work_update(&record)?;
        if kind == AttachmentKind::Photo && !is_image(source) {
            msg_bail_anyhow!(Message::NotAnImage(source.display().to_string()));
        }
        let folder = self.folder_of(&record)?;
        let equipments = self.equipments();
        let (filed, _) = self.file_then(source, &folder, |filed| equipments.add_attachment(id, kind, filed, &now_stamp()))?;
        Ok(filed)
    }

    pub fn add_final_document(&self, id: i64, kind: FinalDocument, source: &Path) -> Result<PathBuf> {
        let record = self.get(id)?;
        lifecycle::check_final_document(&record, kind)?;
        let folder = self.folder_of(&record)?;
        let equipments = self.equipments();
        let (filed, _) = self.file_then(source, &folder, |filed| equipments.set_final_document(id, kind, filed))?;
        Ok(filed)
    }

    pub fn set_return_voucher(&self, id: i64, available: bool) -> Result<()> {
        let record = self.get(id)?;
        lifecycle::check_work_update(&record)?;
        self.equipments().set_return_voucher(id, available)?;
        Ok(())
    }

    pub fn close(&self, id: i64, input: &CloseInput) -> Result<Closure> {
        let record = self.get(id)?;
        let closure = lifecycle::check_close(&record, input)?;
        self.equipments().close(id, &closure)?;
        tracing::info!(id, order = %record.order_number, "record closed");
        Ok(closure)
    }

    pub fn update_destination(&self, id: i64, destination: Option<&str>) -> Result<()> {
        let record = self.get(id)?;
        lifecycle::check_destination_edit(&record)?;
        let destination = destination.map(str::trim).filter(|d| !d.is_empty());
        self.equipments().update_destination(id, destination)?;
        Ok(())
    }

    /// Clears the closure flag and date, leaving a note in the history.
    pub fn reopen(&self, id: i64) -> Result<()> {
        let record = self.get(id)?;
        lifecycle::check_reopen(&record)?;
        let note = Message::ReopenNote(record.closed_at.clone().unwrap_or_default()).to_string();
        self.equipments().reopen(id, &now_stamp(), &note)?;
        tracing::info!(id, order = %record.order_number, "record reopened");
        Ok(())
    }

    /// Releases the unit; returns the exit timestamp.
    pub fn exit_inventory(&self, id: i64) -> Result<String> {
        let record = self.get(id)?;
        lifecycle::check_inventory_exit(&record, self.exit_policy)?;
        let exited_at = now_stamp();
        self.equipments().exit_inventory(id, &exited_at)?;
        tracing::info!(id, order = %record.order_number, "unit left the inventory");
        Ok(exited_at)
    }
}

fn compensate(filed: &Path) {
    match remove_filed(filed) {
        Ok(()) => {
            tracing::warn!(path = %filed.display(), "removed filed copy after failed store write");
            msg_warning!(Message::FiledCopyRemoved(filed.display().to_string()));
        }
        Err(e) => tracing::error!(path = %filed.display(), error = %e, "could not remove orphaned copy"),
    }
}
