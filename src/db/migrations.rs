//! Versioned schema migrations.
//!
//! Applied versions are recorded in the `migrations` table. Pending ones run
//! in order inside a single transaction when the store is opened, so a
//! failing step leaves the schema untouched.
//!
//! Stores created by the earlier desktop tools have no `migrations` table.
//! Every step is written to be a no-op on what already exists, so such a
//! store is upgraded in place without losing rows.
//!
//! ```rust,no_run
//! use eqtrack::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("control_equipos.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::equipment::AttachmentKind;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success, msg_warning};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};
use serde::Deserialize;
use std::path::Path;

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Structured history entries carry this schema version; plain-text
/// histories imported from old stores are version 1.
pub const INTERVENTION_SCHEMA_VERSION: u32 = 2;
pub const LEGACY_INTERVENTION_SCHEMA_VERSION: u32 = 1;

/// Columns older stores may lack, added by v2.
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[
    ("nombre_equipo", "TEXT"),
    ("numero_ot", "TEXT"),
    ("defect_report", "TEXT"),
    ("obs_entrada", "TEXT"),
    ("doc_entrada", "TEXT"),
    ("fotos", "TEXT"),
    ("log_trabajo", "TEXT"),
    ("obs_salida", "TEXT"),
    ("cerrado", "INTEGER DEFAULT 0"),
    ("fecha_cierre", "TEXT"),
    ("contenedor", "INTEGER"),
    ("destino", "TEXT"),
    ("horas_trabajo", "REAL"),
    ("obs_cierre", "TEXT"),
    ("certificado_cat", "TEXT"),
    ("defect_report_final", "TEXT"),
    ("vale_devolucion", "TEXT"),
    ("fecha_salida", "TEXT"),
    ("inventario", "INTEGER DEFAULT 1"),
    ("doc_folder_path", "TEXT"),
    // ADD COLUMN cannot take a CURRENT_TIMESTAMP default
    ("created_at", "DATETIME"),
    ("updated_at", "DATETIME"),
];

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: equipment table and lookup indices
        self.add_migration(1, "create_equipment_table", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS equipos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    nombre_equipo TEXT,
                    pn TEXT NOT NULL,
                    sn TEXT NOT NULL,
                    estado_entrada TEXT,
                    numero_ot TEXT NOT NULL UNIQUE,
                    defect_report TEXT,
                    obs_entrada TEXT,
                    fecha_entrada TEXT,
                    doc_entrada TEXT,
                    fotos TEXT,
                    estado_salida TEXT,
                    log_trabajo TEXT,
                    obs_salida TEXT,
                    cerrado INTEGER DEFAULT 0,
                    fecha_cierre TEXT,
                    contenedor INTEGER,
                    destino TEXT,
                    horas_trabajo REAL,
                    obs_cierre TEXT,
                    certificado_cat TEXT,
                    defect_report_final TEXT,
                    vale_devolucion TEXT,
                    fecha_salida TEXT,
                    inventario INTEGER DEFAULT 1,
                    doc_folder_path TEXT,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: columns missing from stores written by earlier tools
        self.add_migration(2, "add_missing_columns", |tx| {
            for (column, definition) in ADDITIVE_COLUMNS {
                if !column_exists(tx, "equipos", column)? {
                    tx.execute(&format!("ALTER TABLE equipos ADD COLUMN {} {}", column, definition), [])?;
                    msg_debug!(format!("added column equipos.{}", column));
                }
            }
            // Indices go after the columns they cover exist
            tx.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_equipos_numero_ot ON equipos(numero_ot);
                 CREATE INDEX IF NOT EXISTS idx_equipos_pn_sn ON equipos(pn, sn);
                 CREATE INDEX IF NOT EXISTS idx_equipos_inventario ON equipos(inventario);
                 CREATE INDEX IF NOT EXISTS idx_equipos_fecha_entrada ON equipos(fecha_entrada);
                 CREATE INDEX IF NOT EXISTS idx_equipos_fecha_cierre ON equipos(fecha_cierre);",
            )?;
            Ok(())
        });

        // Version 3: history and attachments as child tables
        self.add_migration(3, "add_interventions_and_attachments", |tx| {
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS intervenciones (
                    id INTEGER PRIMARY KEY,
                    equipo_id INTEGER NOT NULL REFERENCES equipos(id) ON DELETE CASCADE,
                    fecha TEXT,
                    texto TEXT NOT NULL,
                    schema_version INTEGER NOT NULL DEFAULT 2
                );
                CREATE INDEX IF NOT EXISTS idx_intervenciones_equipo ON intervenciones(equipo_id);
                CREATE TABLE IF NOT EXISTS adjuntos (
                    id INTEGER PRIMARY KEY,
                    equipo_id INTEGER NOT NULL REFERENCES equipos(id) ON DELETE CASCADE,
                    tipo TEXT NOT NULL,
                    ruta TEXT NOT NULL,
                    fecha TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_adjuntos_equipo ON adjuntos(equipo_id);",
            )?;
            import_legacy_lists(tx)
        });

        // Version 4: order numbers unique at the store level
        self.add_migration(4, "unique_order_number", |tx| {
            let duplicates: i64 = tx.query_row(
                "SELECT COUNT(*) FROM (SELECT numero_ot FROM equipos WHERE numero_ot IS NOT NULL GROUP BY numero_ot HAVING COUNT(*) > 1)",
                [],
                |row| row.get(0),
            )?;
            if duplicates > 0 {
                // Leave the data alone; the entry check still refuses new duplicates
                tracing::warn!(duplicates, "duplicate order numbers present, unique index not created");
                msg_warning!(Message::DuplicateValue("numero_ot".to_string()));
                return Ok(());
            }
            tx.execute("CREATE UNIQUE INDEX IF NOT EXISTS idx_equipos_numero_ot_unique ON equipos(numero_ot)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));
        let tx = conn.transaction()?;

        for migration in pending {
            msg_info!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_success!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    tracing::error!(version = migration.version, error = ?e, "migration failed");
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_success!(Message::AllMigrationsCompleted);
        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }

    /// Forgets migration records above `target_version` so they run again on
    /// the next open. Schema changes are not reversed.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;
        if target_version >= current_version {
            msg_info!(Message::NothingToRollback);
            return Ok(());
        }

        msg_info!(Message::RollingBack(current_version, target_version));
        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;
        msg_success!(Message::RollbackCompleted(target_version));
        Ok(())
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?.collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|name| name == column))
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    entry: String,
}

/// A history cell decoded into `(timestamp, text, schema_version)` rows,
/// oldest first.
pub fn parse_legacy_history(raw: &str) -> Vec<(Option<String>, String, u32)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<LegacyEntry>>(raw) {
        // Stored newest first
        Ok(entries) => entries
            .into_iter()
            .rev()
            .filter(|e| !e.entry.trim().is_empty())
            .map(|e| (e.timestamp.filter(|t| !t.trim().is_empty()), e.entry, INTERVENTION_SCHEMA_VERSION))
            .collect(),
        Err(_) => vec![(None, raw.to_string(), LEGACY_INTERVENTION_SCHEMA_VERSION)],
    }
}

/// A photo list cell decoded into paths.
pub fn parse_legacy_files(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(paths) => paths.into_iter().filter(|p| !p.trim().is_empty()).collect(),
        Err(_) => vec![raw.to_string()],
    }
}

fn import_legacy_lists(tx: &Transaction) -> Result<()> {
    let rows: Vec<(i64, Option<String>, Option<String>)> = {
        // Records with children were imported already
        let mut stmt = tx.prepare(
            "SELECT id, log_trabajo, fotos FROM equipos e
             WHERE (COALESCE(log_trabajo, '') <> '' OR COALESCE(fotos, '') <> '')
               AND NOT EXISTS (SELECT 1 FROM intervenciones i WHERE i.equipo_id = e.id)
               AND NOT EXISTS (SELECT 1 FROM adjuntos a WHERE a.equipo_id = e.id)",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    for (id, history, files) in &rows {
        for (timestamp, text, version) in parse_legacy_history(history.as_deref().unwrap_or("")) {
            tx.execute(
                "INSERT INTO intervenciones (equipo_id, fecha, texto, schema_version) VALUES (?1, ?2, ?3, ?4)",
                params![id, timestamp, text, version],
            )?;
        }
        for path in parse_legacy_files(files.as_deref().unwrap_or("")) {
            let kind = AttachmentKind::from_path(Path::new(&path));
            tx.execute(
                "INSERT INTO adjuntos (equipo_id, tipo, ruta) VALUES (?1, ?2, ?3)",
                params![id, kind, path],
            )?;
        }
    }

    if !rows.is_empty() {
        msg_info!(Message::LegacyHistoryImported(rows.len()));
    }
    Ok(())
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
