//! Equipment repository over the `equipos` table and its child tables.
//!
//! Column names are the workshop's original ones so existing stores keep
//! working; everything above this module sees the English field names of
//! [`Equipment`].

use crate::db::db::{Db, StoreError};
use crate::db::migrations::INTERVENTION_SCHEMA_VERSION;
use crate::libs::equipment::{Attachment, AttachmentKind, Closure, EntryCondition, Equipment, ExitCondition, FinalDocument, Intervention, NewEquipment};
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

const EQUIPMENT_COLUMNS: &str = "id, nombre_equipo, pn, sn, numero_ot, defect_report, estado_entrada, obs_entrada, fecha_entrada, \
     doc_entrada, doc_folder_path, estado_salida, obs_salida, cerrado, fecha_cierre, destino, horas_trabajo, contenedor, \
     obs_cierre, certificado_cat, defect_report_final, vale_devolucion, inventario, fecha_salida";

const INSERT_EQUIPMENT: &str = "INSERT INTO equipos (
        nombre_equipo, pn, sn, numero_ot, defect_report, estado_entrada,
        obs_entrada, doc_entrada, fecha_entrada, cerrado, inventario, doc_folder_path
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 1, ?10)";

const SELECT_ORDER_TAKEN: &str = "SELECT COUNT(*) FROM equipos WHERE numero_ot = ?1 AND (?2 IS NULL OR id <> ?2)";

const SELECT_ARISING_COUNT: &str = "SELECT COUNT(*) FROM equipos WHERE pn = ?1 AND sn = ?2 AND (?3 IS NULL OR id < ?3)";

const SELECT_COUNTS: &str = "SELECT COUNT(*), COALESCE(SUM(CASE WHEN COALESCE(inventario, 1) = 1 THEN 1 ELSE 0 END), 0) FROM equipos";

const UPDATE_WORK: &str = "UPDATE equipos SET estado_salida = COALESCE(?2, estado_salida), obs_salida = COALESCE(?3, obs_salida),
        updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const UPDATE_CLOSE: &str = "UPDATE equipos SET destino = ?2, horas_trabajo = ?3, contenedor = ?4, obs_cierre = ?5,
        cerrado = 1, fecha_cierre = ?6, updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const UPDATE_DESTINATION: &str = "UPDATE equipos SET destino = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const UPDATE_REOPEN: &str = "UPDATE equipos SET cerrado = 0, fecha_cierre = NULL, updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const UPDATE_VOUCHER: &str = "UPDATE equipos SET vale_devolucion = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const UPDATE_EXIT: &str = "UPDATE equipos SET inventario = 0, fecha_salida = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1";

const INSERT_INTERVENTION: &str = "INSERT INTO intervenciones (equipo_id, fecha, texto, schema_version) VALUES (?1, ?2, ?3, ?4)";

const SELECT_INTERVENTIONS: &str = "SELECT id, fecha, texto, schema_version FROM intervenciones WHERE equipo_id = ?1 ORDER BY id DESC";

const INSERT_ATTACHMENT: &str = "INSERT INTO adjuntos (equipo_id, tipo, ruta, fecha) VALUES (?1, ?2, ?3, ?4)";

const SELECT_ATTACHMENTS: &str = "SELECT id, tipo, ruta, fecha FROM adjuntos WHERE equipo_id = ?1 ORDER BY id";

/// Which side of the inventory flag to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InventoryFilter {
    #[default]
    All,
    In,
    Out,
}

impl InventoryFilter {
    fn flag(self) -> Option<i64> {
        match self {
            InventoryFilter::All => None,
            InventoryFilter::In => Some(1),
            InventoryFilter::Out => Some(0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Matched against OT, name, PN and SN.
    pub search: Option<String>,
    pub inventory: InventoryFilter,
}

fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(row.get::<_, Option<String>>(column)?.filter(|value| !value.trim().is_empty()))
}

fn flag(row: &Row<'_>, column: &str, default: bool) -> rusqlite::Result<bool> {
    Ok(match row.get_ref(column)? {
        ValueRef::Null => default,
        ValueRef::Integer(value) => value != 0,
        ValueRef::Real(value) => value != 0.0,
        ValueRef::Text(value) => {
            let value = String::from_utf8_lossy(value);
            let value = value.trim();
            !value.is_empty() && value != "0"
        }
        ValueRef::Blob(value) => !value.is_empty(),
    })
}

/// Hours written by older tools may be text, empty or not a number at all.
fn hours(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Integer(value) => Some(value as f64),
        ValueRef::Real(value) => Some(value),
        ValueRef::Text(value) => String::from_utf8_lossy(value).trim().replace(',', ".").parse::<f64>().ok(),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn map_equipment(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    let entry_condition = text(row, "estado_entrada")?.and_then(|label| label.parse::<EntryCondition>().ok()).unwrap_or_default();
    // Older tools stored "" for "no exit condition yet"
    let exit_condition = text(row, "estado_salida")?.and_then(|label| label.parse::<ExitCondition>().ok());

    Ok(Equipment {
        id: row.get("id")?,
        name: text(row, "nombre_equipo")?.unwrap_or_default(),
        part_number: row.get("pn")?,
        serial_number: row.get("sn")?,
        order_number: text(row, "numero_ot")?.unwrap_or_default(),
        defect_report: text(row, "defect_report")?,
        entry_condition,
        entry_remarks: text(row, "obs_entrada")?,
        entry_date: text(row, "fecha_entrada")?,
        entry_document: text(row, "doc_entrada")?,
        folder: text(row, "doc_folder_path")?,
        exit_condition,
        exit_remarks: text(row, "obs_salida")?,
        closed: flag(row, "cerrado", false)?,
        closed_at: text(row, "fecha_cierre")?,
        destination: text(row, "destino")?,
        hours: hours(row, "horas_trabajo")?,
        container: flag(row, "contenedor", false)?,
        closure_remarks: text(row, "obs_cierre")?,
        certificate: text(row, "certificado_cat")?,
        final_defect_report: text(row, "defect_report_final")?,
        return_voucher: flag(row, "vale_devolucion", false)?,
        in_inventory: flag(row, "inventario", true)?,
        exited_at: text(row, "fecha_salida")?,
    })
}

fn map_intervention(row: &Row<'_>) -> rusqlite::Result<Intervention> {
    Ok(Intervention {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        text: row.get(2)?,
        schema_version: row.get(3)?,
    })
}

fn map_attachment(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        kind: row.get::<_, String>(1)?.parse().unwrap_or(AttachmentKind::Document),
        path: row.get(2)?,
        added_at: row.get(3)?,
    })
}

fn path_text(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}

pub struct Equipments<'a> {
    db: &'a Db,
}

impl<'a> Equipments<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub fn insert(&self, input: &NewEquipment, entry_date: &str, entry_document: Option<&Path>, folder: &Path) -> Result<i64, StoreError> {
        let document = path_text(entry_document);
        let folder = folder.to_string_lossy().into_owned();
        self.db.execute(
            INSERT_EQUIPMENT,
            &[
                &input.name,
                &input.part_number,
                &input.serial_number,
                &input.order_number,
                &input.defect_report,
                &input.entry_condition,
                &input.entry_remarks,
                &document,
                &entry_date,
                &folder,
            ],
        )
    }

    pub fn get(&self, id: i64) -> Result<Option<Equipment>, StoreError> {
        let sql = format!("SELECT {} FROM equipos WHERE id = ?1", EQUIPMENT_COLUMNS);
        self.db.fetch_one(&sql, &[&id], map_equipment)
    }

    pub fn require(&self, id: i64) -> Result<Equipment, StoreError> {
        self.get(id)?.ok_or(StoreError::NotFound(id))
    }

    pub fn find_by_order(&self, order_number: &str) -> Result<Option<Equipment>, StoreError> {
        let sql = format!("SELECT {} FROM equipos WHERE numero_ot = ?1", EQUIPMENT_COLUMNS);
        self.db.fetch_one(&sql, &[&order_number.trim()], map_equipment)
    }

    pub fn order_exists(&self, order_number: &str, exclude_id: Option<i64>) -> Result<bool, StoreError> {
        Ok(self.db.count(SELECT_ORDER_TAKEN, &[&order_number.trim(), &exclude_id])? > 0)
    }

    /// Entries of the same PN/SN pair, limited to those stored before
    /// `before` when given.
    pub fn count_arisings(&self, part_number: &str, serial_number: &str, before: Option<i64>) -> Result<i64, StoreError> {
        self.db.count(SELECT_ARISING_COUNT, &[&part_number, &serial_number, &before])
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Equipment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM equipos
             WHERE (?1 IS NULL OR numero_ot LIKE ?1 OR nombre_equipo LIKE ?1 OR pn LIKE ?1 OR sn LIKE ?1)
               AND (?2 IS NULL OR COALESCE(inventario, 1) = ?2)
             ORDER BY fecha_entrada DESC, id DESC",
            EQUIPMENT_COLUMNS
        );
        let pattern = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(|s| format!("%{}%", s));
        self.db.fetch_all(&sql, &[&pattern, &filter.inventory.flag()], map_equipment)
    }

    /// `(total, in_inventory)` for the status line.
    pub fn counts(&self) -> Result<(i64, i64), StoreError> {
        Ok(self.db.fetch_one(SELECT_COUNTS, &[], |row| Ok((row.get(0)?, row.get(1)?)))?.unwrap_or((0, 0)))
    }

    pub fn in_inventory(&self) -> Result<Vec<Equipment>, StoreError> {
        self.list(&ListFilter {
            search: None,
            inventory: InventoryFilter::In,
        })
    }

    pub fn closed_in_inventory(&self) -> Result<Vec<Equipment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM equipos WHERE cerrado = 1 AND COALESCE(inventario, 1) = 1 ORDER BY fecha_cierre",
            EQUIPMENT_COLUMNS
        );
        self.db.fetch_all(&sql, &[], map_equipment)
    }

    /// `None` keeps the stored value.
    pub fn update_work(&self, id: i64, exit_condition: Option<ExitCondition>, exit_remarks: Option<&str>) -> Result<(), StoreError> {
        self.db.update(id, UPDATE_WORK, &[&id, &exit_condition, &exit_remarks])
    }

    pub fn append_intervention(&self, id: i64, timestamp: &str, text: &str) -> Result<i64, StoreError> {
        self.db.execute(INSERT_INTERVENTION, &[&id, &timestamp, &text, &INTERVENTION_SCHEMA_VERSION])
    }

    /// Newest first.
    pub fn interventions(&self, id: i64) -> Result<Vec<Intervention>, StoreError> {
        self.db.fetch_all(SELECT_INTERVENTIONS, &[&id], map_intervention)
    }

    pub fn add_attachment(&self, id: i64, kind: AttachmentKind, path: &Path, timestamp: &str) -> Result<i64, StoreError> {
        let path = path.to_string_lossy().into_owned();
        self.db.execute(INSERT_ATTACHMENT, &[&id, &kind, &path, &timestamp])
    }

    pub fn attachments(&self, id: i64) -> Result<Vec<Attachment>, StoreError> {
        self.db.fetch_all(SELECT_ATTACHMENTS, &[&id], map_attachment)
    }

    pub fn set_final_document(&self, id: i64, kind: FinalDocument, path: &Path) -> Result<(), StoreError> {
        let sql = format!("UPDATE equipos SET {} = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1", kind.column());
        let path = path.to_string_lossy().into_owned();
        self.db.update(id, &sql, &[&id, &path])
    }

    pub fn set_return_voucher(&self, id: i64, available: bool) -> Result<(), StoreError> {
        self.db.update(id, UPDATE_VOUCHER, &[&id, &(available as i64)])
    }

    pub fn close(&self, id: i64, closure: &Closure) -> Result<(), StoreError> {
        self.db.update(
            id,
            UPDATE_CLOSE,
            &[
                &id,
                &closure.destination,
                &closure.hours,
                &(closure.container as i64),
                &closure.remarks,
                &closure.closed_at,
            ],
        )
    }

    pub fn update_destination(&self, id: i64, destination: Option<&str>) -> Result<(), StoreError> {
        self.db.update(id, UPDATE_DESTINATION, &[&id, &destination])
    }

    /// Clears the closure and appends `note` to the history, both or neither.
    pub fn reopen(&self, id: i64, timestamp: &str, note: &str) -> Result<(), StoreError> {
        let found = self.db.transaction(|tx| {
            if tx.execute(UPDATE_REOPEN, params![id])? == 0 {
                return Ok(false);
            }
            tx.execute(INSERT_INTERVENTION, params![id, timestamp, note, INTERVENTION_SCHEMA_VERSION])?;
            Ok(true)
        })?;
        if found {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    pub fn exit_inventory(&self, id: i64, timestamp: &str) -> Result<(), StoreError> {
        self.db.update(id, UPDATE_EXIT, &[&id, &timestamp])
    }
}

