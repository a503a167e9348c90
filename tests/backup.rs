#[cfg(test)]
mod tests {
    use eqtrack::db::db::Db;
    use eqtrack::db::equipments::Equipments;
    use eqtrack::libs::backup::{create_backup, list_backups, restore_backup, BackupError};
    use eqtrack::libs::equipment::NewEquipment;
    use eqtrack::libs::lifecycle::ExitPolicy;
    use eqtrack::libs::workshop::Workshop;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct BackupTestContext {
        temp_dir: TempDir,
        db_path: PathBuf,
        backup_dir: PathBuf,
    }

    impl TestContext for BackupTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("control_equipos.db");
            let backup_dir = temp_dir.path().join("backups");
            BackupTestContext {
                temp_dir,
                db_path,
                backup_dir,
            }
        }
    }

    impl BackupTestContext {
        fn register(&self, order_number: &str) {
            let db = Db::open(&self.db_path).unwrap();
            let workshop = Workshop::with_settings(&db, self.temp_dir.path().join("docs"), 50, ExitPolicy::default());
            let input = NewEquipment {
                name: "Transponder".to_string(),
                part_number: "PN-4410".to_string(),
                serial_number: "SN-9".to_string(),
                order_number: order_number.to_string(),
                ..Default::default()
            };
            workshop.register(&input, None).unwrap();
        }

        fn record_count(&self) -> i64 {
            let db = Db::open(&self.db_path).unwrap();
            Equipments::new(&db).counts().unwrap().0
        }
    }

    #[test_context(BackupTestContext)]
    #[test]
    fn test_create_and_list(ctx: &mut BackupTestContext) {
        ctx.register("OT-1");

        let snapshot = create_backup(&ctx.db_path, &ctx.backup_dir).unwrap();
        let name = snapshot.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("backup_control_equipos_"));
        assert!(name.ends_with(".tar.gz"));

        fs::write(ctx.backup_dir.join("notes.txt"), "not a snapshot").unwrap();
        assert_eq!(list_backups(&ctx.backup_dir).unwrap(), vec![snapshot]);
    }

    #[test_context(BackupTestContext)]
    #[test]
    fn test_restore_brings_back_old_rows(ctx: &mut BackupTestContext) {
        ctx.register("OT-1");
        let snapshot = create_backup(&ctx.db_path, &ctx.backup_dir).unwrap();
        ctx.register("OT-2");
        assert_eq!(ctx.record_count(), 2);

        restore_backup(&snapshot, &ctx.db_path).unwrap();

        assert_eq!(ctx.record_count(), 1);
    }

    #[test_context(BackupTestContext)]
    #[test]
    fn test_bad_archive_rolls_back(ctx: &mut BackupTestContext) {
        ctx.register("OT-1");
        let broken = ctx.temp_dir.path().join("backup_control_equipos_broken.tar.gz");
        fs::write(&broken, b"definitely not gzip").unwrap();

        let result = restore_backup(&broken, &ctx.db_path);

        assert!(matches!(result, Err(BackupError::Extract { .. })));
        assert_eq!(ctx.record_count(), 1);
    }

    #[test_context(BackupTestContext)]
    #[test]
    fn test_missing_inputs(ctx: &mut BackupTestContext) {
        assert!(matches!(create_backup(&ctx.db_path, &ctx.backup_dir), Err(BackupError::MissingDatabase(_))));
        assert!(matches!(
            restore_backup(&ctx.backup_dir.join("gone.tar.gz"), &ctx.db_path),
            Err(BackupError::MissingSnapshot(_))
        ));
        assert!(list_backups(&ctx.backup_dir).unwrap().is_empty());
    }
}
