#[cfg(test)]
mod tests {
    use eqtrack::db::db::{Db, StoreError};
    use eqtrack::db::equipments::Equipments;
    use eqtrack::libs::equipment::{AttachmentKind, CloseInput, EntryCondition, ExitCondition, FinalDocument, LifecycleState, NewEquipment};
    use eqtrack::libs::lifecycle::{ExitPolicy, TransitionError};
    use eqtrack::libs::workshop::Workshop;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct WorkshopTestContext {
        temp_dir: TempDir,
        db: Db,
        docs: PathBuf,
    }

    impl TestContext for WorkshopTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("control_equipos.db")).unwrap();
            let docs = temp_dir.path().join("docs");
            WorkshopTestContext { temp_dir, db, docs }
        }
    }

    impl WorkshopTestContext {
        fn workshop(&self) -> Workshop<'_> {
            self.workshop_with(ExitPolicy::ConditionSpecific)
        }

        fn workshop_with(&self, policy: ExitPolicy) -> Workshop<'_> {
            Workshop::with_settings(&self.db, &self.docs, 50, policy)
        }

        fn source(&self, name: &str) -> PathBuf {
            let dir = self.temp_dir.path().join("incoming");
            fs::create_dir_all(&dir).unwrap();
            let path = dir.join(name);
            fs::write(&path, b"scan").unwrap();
            path
        }
    }

    fn unit(order_number: &str) -> NewEquipment {
        NewEquipment {
            name: "Radar altimeter".to_string(),
            part_number: "ABC-123".to_string(),
            serial_number: "SN0001".to_string(),
            order_number: order_number.to_string(),
            defect_report: Some("DR-77".to_string()),
            entry_condition: EntryCondition::Serviceable,
            entry_remarks: None,
        }
    }

    fn refusal(error: &anyhow::Error) -> &TransitionError {
        error.downcast_ref::<TransitionError>().expect("a lifecycle refusal")
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_register_files_entry_document(ctx: &mut WorkshopTestContext) {
        let document = ctx.source("entry.pdf");
        let record = ctx.workshop().register(&unit("OT-2024-001"), Some(&document)).unwrap();

        assert_eq!(record.state(), LifecycleState::Entered);
        assert!(record.in_inventory);
        assert!(record.entry_date.is_some());
        let folder = record.folder.clone().unwrap();
        assert!(folder.ends_with("Arising00"));
        let filed = PathBuf::from(record.entry_document.unwrap());
        assert!(filed.exists());
        assert!(filed.starts_with(&folder));
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_second_arising_gets_next_folder(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        workshop.register(&unit("OT-2024-001"), None).unwrap();
        let again = workshop.register(&unit("OT-2024-002"), None).unwrap();

        assert!(again.folder.unwrap().ends_with("Arising01"));
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_duplicate_order_is_refused(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        workshop.register(&unit("OT-2024-001"), None).unwrap();

        let error = workshop.register(&unit(" OT-2024-001 "), None).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::DuplicateOrder("OT-2024-001".to_string()));

        let equipments = Equipments::new(&ctx.db);
        let (total, _) = equipments.counts().unwrap();
        assert_eq!(total, 1);
        assert!(equipments.find_by_order("OT-2024-001").unwrap().is_some());
        assert!(equipments.find_by_order("OT-2024-999").unwrap().is_none());
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_store_rejects_duplicate_order(ctx: &mut WorkshopTestContext) {
        let equipments = Equipments::new(&ctx.db);
        equipments.insert(&unit("OT-2024-001"), "2024-05-01 08:00", None, &ctx.docs).unwrap();

        let error = equipments.insert(&unit("OT-2024-001"), "2024-05-01 09:00", None, &ctx.docs).unwrap_err();
        assert!(matches!(error, StoreError::Duplicate(ref column) if column == "numero_ot"));
        assert_eq!(equipments.counts().unwrap().0, 1);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_unfiled_record_uses_its_own_arising(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let first = workshop.register(&unit("OT-2024-001"), None).unwrap().id;
        workshop.register(&unit("OT-2024-002"), None).unwrap();
        workshop.register(&unit("OT-2024-003"), None).unwrap();
        ctx.db.conn.execute("UPDATE equipos SET doc_folder_path = NULL WHERE id = ?1", [first]).unwrap();

        let filed = workshop.attach(first, &ctx.source("front.jpg"), AttachmentKind::Photo).unwrap();
        assert!(filed.parent().unwrap().ends_with("Arising00"));
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_invalid_part_number_is_refused(ctx: &mut WorkshopTestContext) {
        let mut input = unit("OT-2024-001");
        input.part_number = "A".to_string();

        let error = ctx.workshop().register(&input, None).unwrap_err();
        assert!(matches!(refusal(&error), TransitionError::Invalid(_)));
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_close_needs_exit_condition(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let record = workshop.register(&unit("OT-2024-001"), None).unwrap();

        let input = CloseInput {
            hours: "2".to_string(),
            ..Default::default()
        };
        let error = workshop.close(record.id, &input).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::MissingExitCondition);
        assert!(!workshop.get(record.id).unwrap().closed);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_serviceable_exit_needs_certificate_and_voucher(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let id = workshop.register(&unit("OT-2024-001"), None).unwrap().id;

        workshop.update_work(id, Some(ExitCondition::Serviceable), Some("Bench test passed")).unwrap();
        let closure = workshop
            .close(
                id,
                &CloseInput {
                    hours: "4.5".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(closure.hours, Some(4.5));

        let error = workshop.exit_inventory(id).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::MissingCertificate);

        workshop.add_final_document(id, FinalDocument::Certificate, &ctx.source("cat.pdf")).unwrap();
        let error = workshop.exit_inventory(id).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::MissingReturnVoucher);

        workshop.set_return_voucher(id, true).unwrap();
        workshop.exit_inventory(id).unwrap();

        let record = workshop.get(id).unwrap();
        assert!(!record.in_inventory);
        assert!(record.exited_at.is_some());
        assert_eq!(record.state(), LifecycleState::ExitedInventory);

        let error = workshop.add_intervention(id, "late note").unwrap_err();
        assert!(matches!(refusal(&error), TransitionError::AlreadyExited(_)));
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_strict_policy_needs_a_final_document(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let id = workshop.register(&unit("OT-2024-001"), None).unwrap().id;
        workshop.update_work(id, Some(ExitCondition::Standby), None).unwrap();
        workshop.close(id, &CloseInput::default()).unwrap();
        workshop.set_return_voucher(id, true).unwrap();

        let error = ctx.workshop_with(ExitPolicy::Strict).exit_inventory(id).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::MissingFinalDocument(ExitCondition::Standby));

        workshop.exit_inventory(id).unwrap();
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_reopen_leaves_a_note(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let id = workshop.register(&unit("OT-2024-001"), None).unwrap().id;
        workshop.update_work(id, Some(ExitCondition::Repairable), None).unwrap();
        workshop.close(id, &CloseInput::default()).unwrap();

        workshop.reopen(id).unwrap();

        let record = workshop.get(id).unwrap();
        assert!(!record.closed);
        assert!(record.closed_at.is_none());
        let history = Equipments::new(&ctx.db).interventions(id).unwrap();
        assert!(history[0].text.contains("reopened"));

        let error = workshop.reopen(id).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::NotClosed);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_destination_locked_unless_repairable(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let repairable = workshop.register(&unit("OT-2024-001"), None).unwrap().id;
        workshop.update_work(repairable, Some(ExitCondition::Repairable), None).unwrap();
        workshop.close(repairable, &CloseInput::default()).unwrap();
        workshop.update_destination(repairable, Some("  Overhaul shop  ")).unwrap();
        assert_eq!(workshop.get(repairable).unwrap().destination.as_deref(), Some("Overhaul shop"));

        let serviceable = workshop.register(&unit("OT-2024-002"), None).unwrap().id;
        workshop.update_work(serviceable, Some(ExitCondition::Serviceable), None).unwrap();
        workshop.close(serviceable, &CloseInput::default()).unwrap();
        let error = workshop.update_destination(serviceable, Some("Stores")).unwrap_err();
        assert_eq!(refusal(&error), &TransitionError::ClosureLocked);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_photos_must_be_images(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let id = workshop.register(&unit("OT-2024-001"), None).unwrap().id;
        let scan = ctx.source("report.pdf");

        assert!(workshop.attach(id, &scan, AttachmentKind::Photo).is_err());
        workshop.attach(id, &scan, AttachmentKind::Scan).unwrap();
        workshop.attach(id, &ctx.source("front.jpg"), AttachmentKind::Photo).unwrap();

        let attachments = Equipments::new(&ctx.db).attachments(id).unwrap();
        let kinds: Vec<AttachmentKind> = attachments.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AttachmentKind::Scan, AttachmentKind::Photo]);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_failed_write_removes_filed_copy(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let record = workshop.register(&unit("OT-2024-001"), None).unwrap();
        ctx.db.conn.execute("DROP TABLE adjuntos", []).unwrap();

        assert!(workshop.attach(record.id, &ctx.source("front.jpg"), AttachmentKind::Photo).is_err());

        let folder = PathBuf::from(record.folder.unwrap());
        assert!(!folder.join("front.jpg").exists());
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_empty_updates_are_refused(ctx: &mut WorkshopTestContext) {
        let workshop = ctx.workshop();
        let id = workshop.register(&unit("OT-2024-001"), None).unwrap().id;

        assert!(workshop.update_work(id, None, Some("   ")).is_err());
        assert!(workshop.add_intervention(id, "  ").is_err());
        workshop.add_intervention(id, "Replaced connector J2").unwrap();
        assert_eq!(Equipments::new(&ctx.db).interventions(id).unwrap().len(), 1);
    }

    #[test_context(WorkshopTestContext)]
    #[test]
    fn test_unknown_record(ctx: &mut WorkshopTestContext) {
        let error = ctx.workshop().get(42).unwrap_err();
        assert!(error.to_string().contains("42"));
    }
}
