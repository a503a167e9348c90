//! Equipment record and its enumerations.
//!
//! Conditions are stored by their workshop label (`Útil`, `Reparable`, ...)
//! so stores written by earlier tooling read back unchanged. On the command
//! line either the label or the English name is accepted.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal, $key:literal $(| $alias:literal)*;)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Label written to the store.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Command-line name.
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = value.trim().to_lowercase();
                $(
                    if wanted == $label.to_lowercase() || wanted == $key $(|| wanted == $alias.to_lowercase())* {
                        return Ok($name::$variant);
                    }
                )+
                let known: Vec<&str> = $name::ALL.iter().map(|v| v.key()).collect();
                Err(format!("unknown {} '{}', expected one of: {}", stringify!($name), value, known.join(", ")))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.label()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                text.parse().map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }
    };
}

labelled_enum! {
    /// Condition of the unit when it arrives.
    EntryCondition {
        Serviceable => "Útil", "serviceable";
        Repairable => "Reparable", "repairable";
        Litigation => "Litigio", "litigation";
        Scrapped => "Baja", "scrapped";
    }
}

labelled_enum! {
    /// Condition the unit leaves the bench with.
    ExitCondition {
        Serviceable => "Útil", "serviceable";
        Repairable => "Reparable", "repairable";
        Standby => "Standby", "standby" | "Stamby";
        AwaitingMaterial => "Falto de material", "awaiting-material";
        Scrapped => "Baja", "scrapped";
        Incomplete => "Incompleto", "incomplete";
    }
}

labelled_enum! {
    /// Kind of a file attached during work.
    AttachmentKind {
        Photo => "photo", "photo";
        Scan => "scan", "scan";
        Document => "document", "document";
    }
}

impl Default for EntryCondition {
    fn default() -> Self {
        EntryCondition::Repairable
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

impl AttachmentKind {
    /// Kind guessed from a file extension, used when importing old photo lists.
    pub fn from_path(path: &Path) -> Self {
        if is_image(path) {
            AttachmentKind::Photo
        } else {
            AttachmentKind::Document
        }
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Closeout documents kept in dedicated columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FinalDocument {
    /// CAT airworthiness certificate
    Certificate,
    /// Final defect report
    DefectReport,
}

impl FinalDocument {
    pub fn column(self) -> &'static str {
        match self {
            FinalDocument::Certificate => "certificado_cat",
            FinalDocument::DefectReport => "defect_report_final",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FinalDocument::Certificate => "CAT certificate",
            FinalDocument::DefectReport => "Final defect report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Entered,
    WorkInProgress,
    Closed,
    ExitedInventory,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LifecycleState::Entered => "Entered",
            LifecycleState::WorkInProgress => "Work in progress",
            LifecycleState::Closed => "Closed",
            LifecycleState::ExitedInventory => "Out of inventory",
        };
        f.write_str(text)
    }
}

/// A unit as stored in `equipos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub part_number: String,
    pub serial_number: String,
    pub order_number: String,
    pub defect_report: Option<String>,

    pub entry_condition: EntryCondition,
    pub entry_remarks: Option<String>,
    pub entry_date: Option<String>,
    pub entry_document: Option<String>,
    pub folder: Option<String>,

    pub exit_condition: Option<ExitCondition>,
    pub exit_remarks: Option<String>,

    pub closed: bool,
    pub closed_at: Option<String>,
    pub destination: Option<String>,
    pub hours: Option<f64>,
    pub container: bool,
    pub closure_remarks: Option<String>,
    pub certificate: Option<String>,
    pub final_defect_report: Option<String>,
    pub return_voucher: bool,

    pub in_inventory: bool,
    pub exited_at: Option<String>,
}

impl Equipment {
    pub fn state(&self) -> LifecycleState {
        if !self.in_inventory {
            LifecycleState::ExitedInventory
        } else if self.closed {
            LifecycleState::Closed
        } else if self.exit_condition.is_some() || self.exit_remarks.as_deref().is_some_and(|r| !r.trim().is_empty()) {
            LifecycleState::WorkInProgress
        } else {
            LifecycleState::Entered
        }
    }

    pub fn final_document(&self, kind: FinalDocument) -> Option<&str> {
        let path = match kind {
            FinalDocument::Certificate => self.certificate.as_deref(),
            FinalDocument::DefectReport => self.final_defect_report.as_deref(),
        };
        path.filter(|p| !p.trim().is_empty())
    }

    /// Exit condition label, or "Pending" while work is open.
    pub fn current_status(&self) -> String {
        self.exit_condition.map(|c| c.label().to_string()).unwrap_or_else(|| "Pending".to_string())
    }
}

/// Input of the entry form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEquipment {
    pub name: String,
    pub part_number: String,
    pub serial_number: String,
    pub order_number: String,
    pub defect_report: Option<String>,
    pub entry_condition: EntryCondition,
    pub entry_remarks: Option<String>,
}

impl NewEquipment {
    /// Trims every text field the way the entry form does.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }
        Self {
            name: self.name.trim().to_string(),
            part_number: self.part_number.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
            order_number: self.order_number.trim().to_string(),
            defect_report: clean(&self.defect_report),
            entry_condition: self.entry_condition,
            entry_remarks: clean(&self.entry_remarks),
        }
    }
}

/// Raw closure input as typed by the operator.
#[derive(Debug, Clone, Default)]
pub struct CloseInput {
    pub destination: Option<String>,
    pub hours: String,
    pub container: bool,
    pub remarks: Option<String>,
}

/// Closure values after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub destination: Option<String>,
    pub hours: Option<f64>,
    pub container: bool,
    pub remarks: Option<String>,
    pub closed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intervention {
    pub id: i64,
    /// `None` for entries imported from plain-text histories.
    pub timestamp: Option<String>,
    pub text: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub id: i64,
    pub kind: AttachmentKind,
    pub path: String,
    pub added_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_parse_from_label_or_key() {
        assert_eq!("Útil".parse::<EntryCondition>().unwrap(), EntryCondition::Serviceable);
        assert_eq!("repairable".parse::<ExitCondition>().unwrap(), ExitCondition::Repairable);
        assert_eq!("Falto de material".parse::<ExitCondition>().unwrap(), ExitCondition::AwaitingMaterial);
        assert!("Broken".parse::<ExitCondition>().is_err());
    }

    #[test]
    fn legacy_standby_spelling_is_accepted() {
        assert_eq!("Stamby".parse::<ExitCondition>().unwrap(), ExitCondition::Standby);
        assert_eq!(ExitCondition::Standby.label(), "Standby");
    }

    #[test]
    fn attachment_kind_follows_extension() {
        assert_eq!(AttachmentKind::from_path(Path::new("a/b/photo.JPG")), AttachmentKind::Photo);
        assert_eq!(AttachmentKind::from_path(Path::new("scan.pdf")), AttachmentKind::Document);
    }
}
