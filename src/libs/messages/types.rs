//! Every user-facing message of the application.
//!
//! Variants carry the dynamic parts; the wording lives in `display.rs`.

#[derive(Debug, Clone)]
pub enum Message {
    // === DATABASE / MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    DatabaseVersion(u32),
    MigrationHistory,
    MigrationHistoryEntry(u32, String, String),
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
    LegacyHistoryImported(usize),
    StoreQueryFailed(String),
    DuplicateValue(String),

    // === EQUIPMENT MESSAGES ===
    EquipmentRegistered(String, i64),
    EquipmentNotFound(i64),
    DuplicateOrder(String),
    NoEquipmentFound,
    ListStatus(i64, i64, usize),
    LayoutSaved,
    WorkSaved,
    NothingToUpdate,
    InterventionAdded,
    EmptyIntervention,
    AttachmentAdded(String),
    FinalDocumentAdded(String),
    ReturnVoucherSet(bool),
    EquipmentClosed(String),
    DestinationUpdated,
    EquipmentReopened(String),
    ReopenNote(String),
    EquipmentExited(String),
    ConfirmExit(String),
    ConfirmReopen(String),
    ConfirmSendCloseNotice,
    OperationCancelled,
    ValidationFailed(String),
    TransitionRefused(String),
    SelectExitCondition,
    NoInterventions,
    NoDocuments,
    HistoryHeader,
    DocumentsHeader,

    // === FILING MESSAGES ===
    FileMissing(String),
    FileTooLarge(String, u64),
    FilePermissionDenied(String),
    FileCopyFailed(String),
    FiledCopyRemoved(String),
    NotAnImage(String),
    OpeningDocument(String),
    DocumentIndexOutOfRange(usize),

    // === NOTIFICATION MESSAGES ===
    ClosureNoticeRequiresClosed,
    OpeningComposeWindow,
    MailSent(String),
    SmtpNotConfigured,
    BrowserOpenFailed(String),

    // === EXPORT / REPORT / STATISTICS MESSAGES ===
    ExportCompleted(String),
    NothingToExport,
    ReportGenerated(String),
    NothingToReport,
    NoClosedRecords,
    JobStarted(String),
    JobFinished(String, String),
    JobFailed(String, String),

    // === BACKUP MESSAGES ===
    BackupCreated(String),
    NoBackupsFound,
    BackupsHeader,
    BackupRestored(String),
    ConfirmRestore(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModulePaths,
    ConfigModulePolicy,
    ConfigModuleSmtp,
    PromptSelectModules,
    PromptCompanyName,
    PromptDocsDir,
    PromptBackupDir,
    PromptMaxFileMb,
    PromptExitPolicy,
    PromptNotifyTransport,
    PromptSmtpServer,
    PromptSmtpPort,
    PromptSmtpUser,
    PromptSmtpFrom,
    PromptSmtpRecipient,
    PromptSmtpPassword,
}
