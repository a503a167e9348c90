use crate::db::migrations::init_with_migrations;
use crate::libs::messages::Message;
use crate::msg_error;
use anyhow::Result;
use rusqlite::{ffi, Connection, Row, ToSql, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DB_FILE_NAME: &str = "control_equipos.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write; carries the column name.
    #[error("duplicate value for {0}")]
    Duplicate(String),
    #[error("record {0} not found")]
    NotFound(i64),
    #[error("database error: {source}")]
    Sqlite {
        #[source]
        source: rusqlite::Error,
        sql: String,
    },
}

impl StoreError {
    fn classify(source: rusqlite::Error, sql: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(err, Some(detail)) = &source {
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE || err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY {
                // "UNIQUE constraint failed: equipos.numero_ot"
                let column = detail.rsplit(['.', ' ']).next().unwrap_or(detail.as_str()).to_string();
                return StoreError::Duplicate(column);
            }
        }
        StoreError::Sqlite { source, sql: sql.to_string() }
    }
}

/// Store handle. Built once at startup and passed to whoever needs it.
pub struct Db {
    pub conn: Connection,
    path: PathBuf,
}

impl Db {
    /// Opens the store at `path` and applies pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut db = Self::open_without_migrations(path)?;
        init_with_migrations(&mut db.conn)?;
        Ok(db)
    }

    pub fn open_without_migrations(path: impl AsRef<Path>) -> Result<Db> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        tracing::debug!(path = %path.display(), "store opened");

        Ok(Db { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failed(&self, source: rusqlite::Error, sql: &str, params: &[&dyn ToSql]) -> StoreError {
        let error = StoreError::classify(source, sql);
        if let StoreError::Sqlite { source, .. } = &error {
            let rendered: Vec<String> = params
                .iter()
                .map(|p| match p.to_sql() {
                    Ok(value) => format!("{:?}", value),
                    Err(_) => "?".to_string(),
                })
                .collect();
            tracing::error!(sql, params = ?rendered, error = %source, "store query failed");
            msg_error!(Message::StoreQueryFailed(source.to_string()));
        }
        error
    }

    /// Runs one statement and returns the last inserted row id.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<i64, StoreError> {
        self.conn.execute(sql, params).map_err(|e| self.failed(e, sql, params))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Runs an UPDATE and fails with `NotFound` when no row matched.
    pub fn update(&self, id: i64, sql: &str, params: &[&dyn ToSql]) -> Result<(), StoreError> {
        let affected = self.conn.execute(sql, params).map_err(|e| self.failed(e, sql, params))?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    pub fn fetch_one<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let run = || -> rusqlite::Result<Option<T>> {
            let mut stmt = self.conn.prepare(sql)?;
            let mut rows = stmt.query(params)?;
            match rows.next()? {
                Some(row) => Ok(Some(map(row)?)),
                None => Ok(None),
            }
        };
        run().map_err(|e| self.failed(e, sql, params))
    }

    pub fn fetch_all<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>, StoreError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let run = || -> rusqlite::Result<Vec<T>> {
            let mut stmt = self.conn.prepare(sql)?;
            let rows = stmt.query_map(params, map)?;
            rows.collect()
        };
        run().map_err(|e| self.failed(e, sql, params))
    }

    /// Runs `work` inside one transaction, committing only if it succeeds.
    /// Repositories only borrow the handle, hence the unchecked variant.
    pub fn transaction<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let tx = self.conn.unchecked_transaction().map_err(|e| StoreError::classify(e, "BEGIN"))?;
        let value = work(&tx).map_err(|e| StoreError::classify(e, "transaction"))?;
        tx.commit().map_err(|e| StoreError::classify(e, "COMMIT"))?;
        Ok(value)
    }

    pub fn count(&self, sql: &str, params: &[&dyn ToSql]) -> Result<i64, StoreError> {
        Ok(self.fetch_one(sql, params, |row| row.get::<_, i64>(0))?.unwrap_or(0))
    }
}
