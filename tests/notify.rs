#[cfg(test)]
mod tests {
    use eqtrack::libs::equipment::{EntryCondition, Equipment, ExitCondition};
    use eqtrack::libs::notify::{closure_notice, compose_url, material_request, MaterialRequest};

    fn record(exit_condition: ExitCondition, closed: bool) -> Equipment {
        Equipment {
            id: 7,
            name: "Weather radar".to_string(),
            part_number: "WXR-2100".to_string(),
            serial_number: "SN-3321".to_string(),
            order_number: "OT-2024-118".to_string(),
            defect_report: None,
            entry_condition: EntryCondition::Repairable,
            entry_remarks: None,
            entry_date: Some("2024-06-01 08:30".to_string()),
            entry_document: None,
            folder: None,
            exit_condition: Some(exit_condition),
            exit_remarks: None,
            closed,
            closed_at: closed.then(|| "2024-06-12 16:00".to_string()),
            destination: Some("Overhaul shop".to_string()),
            hours: Some(6.5),
            container: false,
            closure_remarks: None,
            certificate: None,
            final_defect_report: None,
            return_voucher: false,
            in_inventory: true,
            exited_at: None,
        }
    }

    #[test]
    fn test_closure_notice_needs_closed_record() {
        let error = closure_notice(&record(ExitCondition::Serviceable, false)).unwrap_err();
        assert!(error.to_string().contains("Close the record"));
    }

    #[test]
    fn test_closure_notice_fields() {
        let draft = closure_notice(&record(ExitCondition::Repairable, true)).unwrap();

        assert_eq!(draft.subject, "Equipment closure - OT OT-2024-118 - SN SN-3321");
        assert!(draft.body.contains("  - PN / SN: WXR-2100 / SN-3321"));
        assert!(draft.body.contains("  - Closure remarks: None"));
        assert!(draft.body.contains("  - Destination: Overhaul shop"));
    }

    #[test]
    fn test_destination_only_for_repairable() {
        let draft = closure_notice(&record(ExitCondition::Serviceable, true)).unwrap();
        assert!(!draft.body.contains("Destination"));
        assert!(draft.body.contains("Exit condition: Útil"));
    }

    #[test]
    fn test_material_request_fills_missing_references() {
        let request = MaterialRequest {
            part_name: " Power supply board ".to_string(),
            part_number: Some("PSB-11".to_string()),
            serial_number: Some("  ".to_string()),
            quantity: 2,
        };
        let draft = material_request(&record(ExitCondition::AwaitingMaterial, false), &request);

        assert_eq!(draft.subject, "Material request for OT OT-2024-118 (SN: SN-3321)");
        assert!(draft.body.contains("- Part name: Power supply board\n"));
        assert!(draft.body.contains("- Part PN: PSB-11\n"));
        assert!(draft.body.contains("- Part SN: N/A\n"));
        assert!(draft.body.contains("- Quantity: 2"));

        let url = compose_url(&draft);
        assert!(url.contains("su=Material%20request%20for%20OT%20OT-2024-118"));
    }
}
