#[cfg(test)]
mod tests {
    use eqtrack::libs::equipment::{EntryCondition, Equipment, Intervention};
    use eqtrack::libs::report::{Block, InventoryReport, ReportEntry};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ReportTestContext {
        temp_dir: TempDir,
        entries: Vec<ReportEntry>,
    }

    fn unit(id: i64, order_number: &str) -> Equipment {
        Equipment {
            id,
            name: "Navegación VOR".to_string(),
            part_number: "VOR-22".to_string(),
            serial_number: format!("SN-{}", id),
            order_number: order_number.to_string(),
            defect_report: None,
            entry_condition: EntryCondition::Repairable,
            entry_remarks: None,
            entry_date: Some("2024-04-02 10:00".to_string()),
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

    fn intervention(id: i64, timestamp: &str, text: &str) -> Intervention {
        Intervention {
            id,
            timestamp: Some(timestamp.to_string()),
            text: text.to_string(),
            schema_version: 2,
        }
    }

    impl TestContext for ReportTestContext {
        fn setup() -> Self {
            let long_note = "Insulation test on every harness segment ".repeat(12);
            let entries = (1..=30)
                .map(|i| ReportEntry {
                    record: unit(i, &format!("OT-{}", i)),
                    // Newest first, as the store returns them
                    history: vec![
                        intervention(2, "2024-04-05 11:00", &long_note),
                        intervention(1, "2024-04-03 09:00", "Bench test"),
                    ],
                })
                .collect();
            ReportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                entries,
            }
        }
    }

    #[test_context(ReportTestContext)]
    #[test]
    fn test_report_is_written(ctx: &mut ReportTestContext) {
        let path = ctx.temp_dir.path().join("reports").join("inventory.pdf");

        let written = InventoryReport::new("Taller Aviónica").write(&ctx.entries, &path).unwrap();

        let bytes = fs::read(written).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test_context(ReportTestContext)]
    #[test]
    fn test_history_reads_oldest_first(ctx: &mut ReportTestContext) {
        let blocks = InventoryReport::new("Workshop").blocks(&ctx.entries[..1]);

        let history: Vec<&String> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Indented(text) if text.starts_with("- ") => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(history.len(), 2);
        assert!(history[0].contains("Bench test"));
        assert!(blocks.contains(&Block::Heading("OT OT-1".to_string())));
        assert!(blocks.contains(&Block::Heading("Summary (1 units)".to_string())));
    }

    #[test_context(ReportTestContext)]
    #[test]
    fn test_empty_inventory_is_refused(ctx: &mut ReportTestContext) {
        let path = ctx.temp_dir.path().join("empty.pdf");

        assert!(InventoryReport::new("Workshop").write(&[], &path).is_err());
        assert!(!path.exists());
    }
}
