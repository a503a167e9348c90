#[cfg(test)]
mod tests {
    use eqtrack::libs::filing::{copy_document, record_folder, FilingError};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct FilingTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for FilingTestContext {
        fn setup() -> Self {
            FilingTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl FilingTestContext {
        fn source(&self, name: &str, contents: &[u8]) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn target(&self) -> PathBuf {
            self.temp_dir.path().join("docs").join("Arising00")
        }
    }

    #[test_context(FilingTestContext)]
    #[test]
    fn test_name_collisions_get_a_counter(ctx: &mut FilingTestContext) {
        let source = ctx.source("report.pdf", b"first");

        let first = copy_document(&source, &ctx.target(), 50).unwrap();
        let second = copy_document(&source, &ctx.target(), 50).unwrap();
        let third = copy_document(&source, &ctx.target(), 50).unwrap();

        assert_eq!(first.file_name().unwrap(), "report.pdf");
        assert_eq!(second.file_name().unwrap(), "report_1.pdf");
        assert_eq!(third.file_name().unwrap(), "report_2.pdf");
        assert_eq!(fs::read(&first).unwrap(), b"first");
    }

    #[test_context(FilingTestContext)]
    #[test]
    fn test_missing_source_creates_nothing(ctx: &mut FilingTestContext) {
        let missing = ctx.temp_dir.path().join("nope.pdf");

        let result = copy_document(&missing, &ctx.target(), 50);
        assert!(matches!(result, Err(FilingError::MissingSource(_))));
        assert!(!ctx.target().exists());
    }

    #[test_context(FilingTestContext)]
    #[test]
    fn test_oversized_file_is_refused(ctx: &mut FilingTestContext) {
        let source = ctx.source("big.bin", &[0u8; 16]);

        let result = copy_document(&source, &ctx.target(), 0);
        assert!(matches!(result, Err(FilingError::TooLarge { size: 16, max: 0, .. })));
        assert!(!ctx.target().exists());
    }

    #[test]
    fn test_record_folder_layout() {
        let folder = record_folder(Path::new("docs"), "VHF/NAV radio!", "SN/0001", 3);
        assert_eq!(folder, Path::new("docs").join("VHFNAV radio").join("SN_0001").join("Arising03"));
    }
}
