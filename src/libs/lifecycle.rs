//! Record lifecycle rules: entry, work, close, reopen and inventory exit.
//!
//! Every check takes the current record and the proposed change and returns
//! either the accepted value or the reason for refusing it. Nothing here
//! touches the store or the filesystem, so commands call these first and only
//! then file documents or write rows.

use super::equipment::{CloseInput, Closure, Equipment, ExitCondition, FinalDocument, NewEquipment};
use super::formatter::now_stamp;
use super::validators::{validate_hours, validate_order_number, validate_part_number, validate_serial_number, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document requirement for exit conditions other than Serviceable and
/// Repairable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExitPolicy {
    /// Only Serviceable (certificate) and Repairable (final defect report) need a document.
    #[default]
    ConditionSpecific,
    /// Every other condition needs at least one final document as well.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("technical order '{0}' already exists")]
    DuplicateOrder(String),
    #[error("the unit left the inventory on {0}")]
    AlreadyExited(String),
    #[error("the record is already closed")]
    AlreadyClosed,
    #[error("the record is not closed")]
    NotClosed,
    #[error("set an exit condition in the work step first")]
    MissingExitCondition,
    #[error("closure fields are locked; only the destination of a Repairable unit can change")]
    ClosureLocked,
    #[error("the return voucher is not available")]
    MissingReturnVoucher,
    #[error("the CAT certificate is missing for this Serviceable unit")]
    MissingCertificate,
    #[error("the final defect report is missing for this Repairable unit")]
    MissingFinalDefectReport,
    #[error("a final document (certificate or defect report) is required for exit condition {0}")]
    MissingFinalDocument(ExitCondition),
}

/// Business keys valid and the order number not taken.
pub fn check_entry(input: &NewEquipment, order_taken: bool) -> Result<NewEquipment, TransitionError> {
    let input = input.normalized();
    validate_part_number(&input.part_number)?;
    validate_serial_number(&input.serial_number)?;
    validate_order_number(&input.order_number)?;
    if order_taken {
        return Err(TransitionError::DuplicateOrder(input.order_number));
    }
    Ok(input)
}

fn ensure_in_inventory(record: &Equipment) -> Result<(), TransitionError> {
    if record.in_inventory {
        Ok(())
    } else {
        Err(TransitionError::AlreadyExited(record.exited_at.clone().unwrap_or_default()))
    }
}

/// Work fields, history and attachments stay editable until the unit leaves.
pub fn check_work_update(record: &Equipment) -> Result<(), TransitionError> {
    ensure_in_inventory(record)
}

pub fn check_close(record: &Equipment, input: &CloseInput) -> Result<Closure, TransitionError> {
    ensure_in_inventory(record)?;
    if record.closed {
        return Err(TransitionError::AlreadyClosed);
    }
    if record.exit_condition.is_none() {
        return Err(TransitionError::MissingExitCondition);
    }
    let hours = validate_hours(&input.hours)?;
    let trimmed = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    Ok(Closure {
        destination: trimmed(&input.destination),
        hours,
        container: input.container,
        remarks: trimmed(&input.remarks),
        closed_at: now_stamp(),
    })
}

/// Open records always; closed ones only while the exit is Repairable.
pub fn check_destination_edit(record: &Equipment) -> Result<(), TransitionError> {
    ensure_in_inventory(record)?;
    if record.closed && record.exit_condition != Some(ExitCondition::Repairable) {
        return Err(TransitionError::ClosureLocked);
    }
    Ok(())
}

pub fn check_reopen(record: &Equipment) -> Result<(), TransitionError> {
    ensure_in_inventory(record)?;
    if !record.closed {
        return Err(TransitionError::NotClosed);
    }
    Ok(())
}

pub fn check_final_document(record: &Equipment, _kind: FinalDocument) -> Result<(), TransitionError> {
    ensure_in_inventory(record)
}

pub fn check_inventory_exit(record: &Equipment, policy: ExitPolicy) -> Result<(), TransitionError> {
    ensure_in_inventory(record)?;
    if !record.closed {
        return Err(TransitionError::NotClosed);
    }
    let condition = record.exit_condition.ok_or(TransitionError::MissingExitCondition)?;

    match condition {
        ExitCondition::Serviceable if record.final_document(FinalDocument::Certificate).is_none() => {
            return Err(TransitionError::MissingCertificate);
        }
        ExitCondition::Repairable if record.final_document(FinalDocument::DefectReport).is_none() => {
            return Err(TransitionError::MissingFinalDefectReport);
        }
        ExitCondition::Serviceable | ExitCondition::Repairable => {}
        other => {
            let has_any = record.final_document(FinalDocument::Certificate).is_some()
                || record.final_document(FinalDocument::DefectReport).is_some();
            if policy == ExitPolicy::Strict && !has_any {
                return Err(TransitionError::MissingFinalDocument(other));
            }
        }
    }

    if !record.return_voucher {
        return Err(TransitionError::MissingReturnVoucher);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::equipment::EntryCondition;

    fn record() -> Equipment {
        Equipment {
            id: 1,
            name: "Radar altimeter".into(),
            part_number: "ABC-123".into(),
            serial_number: "SN0001".into(),
            order_number: "OT-2024-001".into(),
            defect_report: None,
            entry_condition: EntryCondition::Serviceable,
            entry_remarks: None,
            entry_date: Some("2024-05-02 09:00".into()),
            entry_document: None,
            folder: None,
            exit_condition: None,
            exit_remarks: None,
            closed: false,
            closed_at: None,
            destination: None,
            hours: None,
            container: false,
            closure_remarks: None,
            certificate: None,
            final_defect_report: None,
            return_voucher: false,
            in_inventory: true,
            exited_at: None,
        }
    }

    fn closed(condition: ExitCondition) -> Equipment {
        Equipment {
            exit_condition: Some(condition),
            closed: true,
            closed_at: Some("2024-05-10 17:00".into()),
            ..record()
        }
    }

    #[test]
    fn close_requires_exit_condition() {
        let input = CloseInput { hours: "3".into(), ..Default::default() };
        assert_eq!(check_close(&record(), &input), Err(TransitionError::MissingExitCondition));
    }

    #[test]
    fn close_validates_hours() {
        let open = Equipment { exit_condition: Some(ExitCondition::Standby), ..record() };
        let bad = CloseInput { hours: "-1".into(), ..Default::default() };
        assert!(matches!(check_close(&open, &bad), Err(TransitionError::Invalid(_))));

        let good = CloseInput { hours: "12.5".into(), destination: Some("  ".into()), ..Default::default() };
        let closure = check_close(&open, &good).unwrap();
        assert_eq!(closure.hours, Some(12.5));
        assert_eq!(closure.destination, None);
    }

    #[test]
    fn destination_stays_editable_for_repairable_only() {
        assert!(check_destination_edit(&closed(ExitCondition::Repairable)).is_ok());
        assert_eq!(check_destination_edit(&closed(ExitCondition::Serviceable)), Err(TransitionError::ClosureLocked));
        assert!(check_destination_edit(&record()).is_ok());
    }

    #[test]
    fn exit_needs_closure_first() {
        let open = Equipment { exit_condition: Some(ExitCondition::Serviceable), ..record() };
        assert_eq!(check_inventory_exit(&open, ExitPolicy::default()), Err(TransitionError::NotClosed));
    }

    #[test]
    fn serviceable_exit_needs_certificate_and_voucher() {
        let mut unit = closed(ExitCondition::Serviceable);
        assert_eq!(check_inventory_exit(&unit, ExitPolicy::default()), Err(TransitionError::MissingCertificate));

        unit.certificate = Some("docs/cat.pdf".into());
        assert_eq!(check_inventory_exit(&unit, ExitPolicy::default()), Err(TransitionError::MissingReturnVoucher));

        unit.return_voucher = true;
        assert!(check_inventory_exit(&unit, ExitPolicy::default()).is_ok());
    }

    #[test]
    fn repairable_exit_needs_final_defect_report() {
        let mut unit = closed(ExitCondition::Repairable);
        unit.return_voucher = true;
        unit.certificate = Some("docs/cat.pdf".into());
        assert_eq!(check_inventory_exit(&unit, ExitPolicy::default()), Err(TransitionError::MissingFinalDefectReport));

        unit.final_defect_report = Some("docs/dr.pdf".into());
        assert!(check_inventory_exit(&unit, ExitPolicy::default()).is_ok());
    }

    #[test]
    fn other_conditions_follow_policy() {
        for condition in [ExitCondition::Standby, ExitCondition::AwaitingMaterial, ExitCondition::Scrapped, ExitCondition::Incomplete] {
            let mut unit = closed(condition);
            unit.return_voucher = true;
            assert!(check_inventory_exit(&unit, ExitPolicy::ConditionSpecific).is_ok());
            assert_eq!(check_inventory_exit(&unit, ExitPolicy::Strict), Err(TransitionError::MissingFinalDocument(condition)));

            unit.final_defect_report = Some("docs/dr.pdf".into());
            assert!(check_inventory_exit(&unit, ExitPolicy::Strict).is_ok());
        }
    }

    #[test]
    fn voucher_is_required_under_every_policy() {
        let unit = closed(ExitCondition::Scrapped);
        assert_eq!(check_inventory_exit(&unit, ExitPolicy::ConditionSpecific), Err(TransitionError::MissingReturnVoucher));
    }

    #[test]
    fn exited_units_are_frozen() {
        let mut unit = closed(ExitCondition::Serviceable);
        unit.in_inventory = false;
        unit.exited_at = Some("2024-06-01 08:00".into());
        assert!(matches!(check_work_update(&unit), Err(TransitionError::AlreadyExited(_))));
        assert!(matches!(check_reopen(&unit), Err(TransitionError::AlreadyExited(_))));
    }

    #[test]
    fn reopen_only_closed_records() {
        assert_eq!(check_reopen(&record()), Err(TransitionError::NotClosed));
        assert!(check_reopen(&closed(ExitCondition::Incomplete)).is_ok());
    }

    #[test]
    fn entry_reports_duplicate_order_after_key_checks() {
        let input = NewEquipment {
            name: "Radar altimeter".into(),
            part_number: "ABC-123".into(),
            serial_number: "SN0001".into(),
            order_number: " OT-2024-001 ".into(),
            ..Default::default()
        };
        assert_eq!(check_entry(&input, true), Err(TransitionError::DuplicateOrder("OT-2024-001".into())));
        assert_eq!(check_entry(&input, false).unwrap().order_number, "OT-2024-001");

        let bad = NewEquipment { part_number: "A".into(), ..input };
        assert!(matches!(check_entry(&bad, false), Err(TransitionError::Invalid(_))));
    }
}
