#[cfg(test)]
mod tests {
    use eqtrack::libs::export::{ExportFormat, Exporter};
    use eqtrack::libs::view::{Column, ListView};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        view: ListView,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let view = ListView {
                headers: vec![Column::Order.header().to_string(), Column::Name.header().to_string()],
                rows: vec![
                    vec!["OT-2".to_string(), "VHF radio".to_string()],
                    vec!["OT-10".to_string(), "Radar altimeter, dual".to_string()],
                ],
                styles: vec!["Fy", "Fg"],
            };
            ExportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                view,
            }
        }
    }

    impl ExportTestContext {
        fn output(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join("out").join(name)
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export_matches_view(ctx: &mut ExportTestContext) {
        let exporter = Exporter::new(None, Some(ctx.output("equipment.csv")));
        assert_eq!(exporter.format(), ExportFormat::Csv);

        let written = exporter.export(&ctx.view).unwrap();
        let content = fs::read_to_string(written).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("{},{}", Column::Order.header(), Column::Name.header()));
        assert_eq!(lines[2], "OT-10,\"Radar altimeter, dual\"");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_excel_export_writes_workbook(ctx: &mut ExportTestContext) {
        let exporter = Exporter::new(Some(ExportFormat::Excel), Some(ctx.output("equipment.xlsx")));

        let written = exporter.export(&ctx.view).unwrap();
        let bytes = fs::read(&written).unwrap();

        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_empty_view_is_refused(ctx: &mut ExportTestContext) {
        let output = ctx.output("empty.csv");
        let exporter = Exporter::new(Some(ExportFormat::Csv), Some(output.clone()));

        let error = exporter.export(&ListView::default()).unwrap_err();
        assert!(error.to_string().contains("nothing to export"));
        assert!(!output.exists());
    }

    #[test]
    fn test_default_output_name() {
        let exporter = Exporter::new(Some(ExportFormat::Csv), None);
        let name = exporter.output_path().to_string_lossy().into_owned();
        assert!(name.starts_with("equipment_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(ExportFormat::from_path(Path::new("list.XLSX")), ExportFormat::Excel);
    }
}
