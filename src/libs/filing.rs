//! Document filing under `<docs>/<name>/<serial>/ArisingNN/`.
//!
//! Copies never overwrite: a clashing file name gets `_1`, `_2`, ... before
//! its extension. Size and existence are checked before anything is created.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use super::validators::{max_file_bytes, validate_file_size};

#[derive(Debug, Error)]
pub enum FilingError {
    #[error("source file not found: {0}")]
    MissingSource(PathBuf),
    #[error("{path} is {size} bytes, above the {max} byte limit")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("filing {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilingError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            FilingError::PermissionDenied(path.to_path_buf())
        } else {
            FilingError::Io { path: path.to_path_buf(), source }
        }
    }
}

/// Keeps alphanumerics, spaces and underscores, drops trailing whitespace.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_').collect();
    let cleaned = cleaned.trim_end();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Serial numbers may carry `/`; it must not create extra directories.
pub fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "unnamed".to_string(),
        _ => cleaned,
    }
}

pub fn arising_folder(sequence: i64) -> String {
    format!("Arising{:02}", sequence)
}

/// Folder of one arising of a unit; `sequence` counts earlier entries of
/// the same PN/SN pair.
pub fn record_folder(docs_dir: &Path, name: &str, serial_number: &str, sequence: i64) -> PathBuf {
    docs_dir.join(sanitize_name(name)).join(sanitize_segment(serial_number)).join(arising_folder(sequence))
}

fn free_target(target_dir: &Path, file_name: &str) -> PathBuf {
    let candidate = target_dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let path = Path::new(file_name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    let extension = path.extension().and_then(|e| e.to_str());

    (1..)
        .map(|counter| match extension {
            Some(ext) => target_dir.join(format!("{}_{}.{}", stem, counter, ext)),
            None => target_dir.join(format!("{}_{}", stem, counter)),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}

/// Copies `source` into `target_dir` and returns the stored path.
pub fn copy_document(source: &Path, target_dir: &Path, max_mb: u64) -> Result<PathBuf, FilingError> {
    let metadata = match fs::metadata(source) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(FilingError::MissingSource(source.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(FilingError::MissingSource(source.to_path_buf())),
        Err(e) => return Err(FilingError::from_io(source, e)),
    };

    if validate_file_size(metadata.len(), max_mb).is_err() {
        return Err(FilingError::TooLarge {
            path: source.to_path_buf(),
            size: metadata.len(),
            max: max_file_bytes(max_mb),
        });
    }

    fs::create_dir_all(target_dir).map_err(|e| FilingError::from_io(target_dir, e))?;

    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FilingError::MissingSource(source.to_path_buf()))?;
    let target = free_target(target_dir, file_name);

    fs::copy(source, &target).map_err(|e| FilingError::from_io(&target, e))?;
    tracing::debug!(source = %source.display(), target = %target.display(), "document filed");
    Ok(target)
}

/// Undoes a copy whose database write failed.
pub fn remove_filed(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Opens a filed document with the desktop's default application.
pub fn open_with_default_app(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Err(io::Error::new(io::ErrorKind::NotFound, path.display().to_string()));
    }
    launch(path.as_os_str())
}

/// Hands a path or URL to the platform opener.
pub fn launch(target: &OsStr) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(target);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(target);
        command
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(target);
        command
    };

    command.spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sanitized_for_paths() {
        assert_eq!(sanitize_name("Radar Alt. (L/H)  "), "Radar Alt LH");
        assert_eq!(sanitize_name("***"), "unnamed");
        assert_eq!(sanitize_segment("SN-01/A"), "SN-01_A");
        assert_eq!(sanitize_segment(".."), "unnamed");
    }

    #[test]
    fn arising_folders_are_zero_padded() {
        assert_eq!(arising_folder(0), "Arising00");
        assert_eq!(arising_folder(7), "Arising07");
        assert_eq!(arising_folder(12), "Arising12");
    }

    #[test]
    fn record_folder_layout() {
        let folder = record_folder(Path::new("docs"), "VHF Radio", "SN0001", 1);
        assert_eq!(folder, Path::new("docs").join("VHF Radio").join("SN0001").join("Arising01"));
    }
}
