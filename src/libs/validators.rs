//! Field validators for the entry, close and material request forms.
//!
//! Each validator returns `Ok` or a [`ValidationError`] naming the field and
//! the reason, never panics on user input.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::formatter::TIMESTAMP_FORMAT;

pub const MIN_KEY_LEN: usize = 3;
pub const MAX_KEY_LEN: usize = 30;
pub const MAX_HOURS: f64 = 10_000.0;
pub const DEFAULT_MAX_FILE_MB: u64 = 50;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

fn part_number_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-\s.,/_]+$").expect("valid part number pattern"))
}

fn serial_number_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-.,/_]+$").expect("valid serial number pattern"))
}

fn order_number_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-\s/]+$").expect("valid order number pattern"))
}

fn validate_key(field: &'static str, value: &str, charset: &Regex, allowed: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, "cannot be empty"));
    }
    let len = value.chars().count();
    if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&len) {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {} characters (got {})", MIN_KEY_LEN, MAX_KEY_LEN, len),
        ));
    }
    if !charset.is_match(value) {
        return Err(ValidationError::new(field, format!("only {} are allowed", allowed)));
    }
    Ok(())
}

pub fn validate_part_number(value: &str) -> Result<(), ValidationError> {
    validate_key("PN", value, part_number_charset(), "letters, digits, spaces and - . , / _")
}

/// Serial numbers take the part number charset minus spaces.
pub fn validate_serial_number(value: &str) -> Result<(), ValidationError> {
    validate_key("SN", value, serial_number_charset(), "letters, digits and - . , / _")
}

pub fn validate_order_number(value: &str) -> Result<(), ValidationError> {
    validate_key("OT", value, order_number_charset(), "letters, digits, spaces, - and /")
}

/// Empty input means "not recorded" and yields `Ok(None)`.
pub fn validate_hours(value: &str) -> Result<Option<f64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let hours: f64 = value.parse().map_err(|_| ValidationError::new("Hours", format!("'{}' is not a number", value)))?;
    if !hours.is_finite() {
        return Err(ValidationError::new("Hours", "must be a finite number"));
    }
    if hours < 0.0 {
        return Err(ValidationError::new("Hours", "cannot be negative"));
    }
    if hours > MAX_HOURS {
        return Err(ValidationError::new("Hours", format!("cannot exceed {}", MAX_HOURS)));
    }
    Ok(Some(hours))
}

/// Optional `YYYY-MM-DD HH:MM` timestamp.
pub fn validate_date(value: &str) -> Result<Option<NaiveDateTime>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::new("Date", "expected format YYYY-MM-DD HH:MM"))
}

pub fn max_file_bytes(max_mb: u64) -> u64 {
    max_mb * 1024 * 1024
}

pub fn validate_file_size(size: u64, max_mb: u64) -> Result<(), ValidationError> {
    if size > max_file_bytes(max_mb) {
        let size_mb = size as f64 / (1024.0 * 1024.0);
        return Err(ValidationError::new("File", format!("{:.1} MB exceeds the {} MB limit", size_mb, max_mb)));
    }
    Ok(())
}

/// Part name and quantity are mandatory in a material request.
pub fn validate_material_request(part_name: &str, quantity: &str) -> Result<u32, ValidationError> {
    if part_name.trim().is_empty() {
        return Err(ValidationError::new("Part name", "cannot be empty"));
    }
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Err(ValidationError::new("Quantity", "cannot be empty"));
    }
    match quantity.parse::<u32>() {
        Ok(0) | Err(_) => Err(ValidationError::new("Quantity", "must be a positive whole number")),
        Ok(n) => Ok(n),
    }
}
