//! Compressed snapshots of the store file.
//!
//! A snapshot is `backup_<stem>_<YYYY-mm-dd_HH-MM-SS>.tar.gz` holding the
//! single database file. Restoring sets the current file aside as
//! `<db>.old` first and puts it back if extraction fails.

use super::formatter::FILE_STAMP_FORMAT;
use chrono::Local;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::{Archive, Builder};
use thiserror::Error;

const SNAPSHOT_PREFIX: &str = "backup_";
const SNAPSHOT_SUFFIX: &str = ".tar.gz";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("database file not found: {0}")]
    MissingDatabase(PathBuf),
    #[error("backup file not found: {0}")]
    MissingSnapshot(PathBuf),
    #[error("could not set {path} aside, make sure no other program has it open: {source}")]
    StoreInUse {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not restore from {snapshot}: {reason}. The previous database was put back")]
    Extract { snapshot: PathBuf, reason: String },
    #[error("could not restore from {snapshot} ({reason}) and putting the previous database back failed: {source}. Rename {old} to {db} by hand, then reopen the application")]
    RollbackFailed {
        snapshot: PathBuf,
        reason: String,
        old: PathBuf,
        db: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn snapshot_name(db_path: &Path) -> String {
    let stem = db_path.file_stem().and_then(|s| s.to_str()).unwrap_or("database");
    format!("{}{}_{}{}", SNAPSHOT_PREFIX, stem, Local::now().format(FILE_STAMP_FORMAT), SNAPSHOT_SUFFIX)
}

fn old_path(db_path: &Path) -> PathBuf {
    let mut name = OsString::from(db_path.as_os_str());
    name.push(".old");
    PathBuf::from(name)
}

pub fn create_backup(db_path: &Path, backup_dir: &Path) -> Result<PathBuf, BackupError> {
    if !db_path.is_file() {
        return Err(BackupError::MissingDatabase(db_path.to_path_buf()));
    }
    fs::create_dir_all(backup_dir)?;

    let target = backup_dir.join(snapshot_name(db_path));
    let encoder = GzEncoder::new(File::create(&target)?, Compression::default());
    let mut builder = Builder::new(encoder);

    let entry_name = db_path.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("database.db"));
    builder.append_path_with_name(db_path, &entry_name)?;
    builder.into_inner()?.finish()?;

    tracing::info!(db = %db_path.display(), snapshot = %target.display(), "backup created");
    Ok(target)
}

/// Snapshots in `backup_dir`, newest first.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<PathBuf>, BackupError> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_SUFFIX) && entry.file_type()?.is_file() {
            let modified = entry.metadata()?.modified().ok();
            snapshots.push((modified, entry.path()));
        }
    }

    snapshots.sort_by(|a, b| b.cmp(a));
    Ok(snapshots.into_iter().map(|(_, path)| path).collect())
}

fn extract_database(snapshot: &Path, db_path: &Path) -> Result<(), String> {
    let file = File::open(snapshot).map_err(|e| e.to_string())?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries().map_err(|e| e.to_string())? {
        let mut entry = entry.map_err(|e| e.to_string())?;
        let is_db = entry
            .path()
            .map_err(|e| e.to_string())?
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("db"));
        if is_db {
            entry.unpack(db_path).map_err(|e| e.to_string())?;
            return Ok(());
        }
    }

    Err("the archive holds no .db file".to_string())
}

/// Replaces the store at `db_path` with the database inside `snapshot`.
/// The store must not be open while this runs.
pub fn restore_backup(snapshot: &Path, db_path: &Path) -> Result<(), BackupError> {
    if !snapshot.is_file() {
        return Err(BackupError::MissingSnapshot(snapshot.to_path_buf()));
    }

    let old = old_path(db_path);
    let had_store = db_path.exists();
    if had_store {
        if old.exists() {
            fs::remove_file(&old)?;
        }
        fs::rename(db_path, &old).map_err(|source| BackupError::StoreInUse {
            path: db_path.to_path_buf(),
            source,
        })?;
        tracing::info!(from = %db_path.display(), to = %old.display(), "current database set aside");
    } else if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    match extract_database(snapshot, db_path) {
        Ok(()) => {
            tracing::info!(snapshot = %snapshot.display(), db = %db_path.display(), "database restored");
            Ok(())
        }
        Err(reason) => {
            tracing::error!(snapshot = %snapshot.display(), %reason, "restore failed, rolling back");
            let _ = fs::remove_file(db_path);
            if !had_store {
                return Err(BackupError::Extract {
                    snapshot: snapshot.to_path_buf(),
                    reason,
                });
            }
            match fs::rename(&old, db_path) {
                Ok(()) => Err(BackupError::Extract {
                    snapshot: snapshot.to_path_buf(),
                    reason,
                }),
                Err(source) => Err(BackupError::RollbackFailed {
                    snapshot: snapshot.to_path_buf(),
                    reason,
                    old,
                    db: db_path.to_path_buf(),
                    source,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_names_carry_the_store_stem() {
        let name = snapshot_name(Path::new("/data/control_equipos.db"));
        assert!(name.starts_with("backup_control_equipos_"));
        assert!(name.ends_with(".tar.gz"));
    }

    #[test]
    fn old_path_appends_suffix() {
        assert_eq!(old_path(Path::new("/data/store.db")), PathBuf::from("/data/store.db.old"));
    }
}
