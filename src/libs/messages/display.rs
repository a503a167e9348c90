use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === DATABASE / MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database has pending migrations; they run on next start".to_string(),
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationHistoryEntry(version, name, applied_at) => format!("  v{}: {} (applied: {})", version, name, applied_at),
            Message::NothingToRollback => "Nothing to roll back".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rolled back to v{}", version),
            Message::LegacyHistoryImported(count) => format!("Imported legacy history and attachments of {} record(s)", count),
            Message::StoreQueryFailed(error) => format!("Database operation failed: {}", error),
            Message::DuplicateValue(column) => format!("A record with the same {} already exists", column),

            // === EQUIPMENT MESSAGES ===
            Message::EquipmentRegistered(order, id) => format!("Equipment registered: OT {} (id {})", order, id),
            Message::EquipmentNotFound(id) => format!("No equipment record with id {}", id),
            Message::DuplicateOrder(order) => format!("Technical order '{}' already exists", order),
            Message::NoEquipmentFound => "No equipment matches the current filter".to_string(),
            Message::ListStatus(total, in_inventory, shown) => {
                format!("Total: {} | In inventory: {} | Showing: {}", total, in_inventory, shown)
            }
            Message::LayoutSaved => "List layout saved".to_string(),
            Message::WorkSaved => "Work changes saved".to_string(),
            Message::NothingToUpdate => "Nothing to update".to_string(),
            Message::InterventionAdded => "Intervention added to the history".to_string(),
            Message::EmptyIntervention => "An intervention needs some text".to_string(),
            Message::AttachmentAdded(path) => format!("Document filed at {}", path),
            Message::FinalDocumentAdded(kind) => format!("{} filed", kind),
            Message::ReturnVoucherSet(true) => "Return voucher marked as available".to_string(),
            Message::ReturnVoucherSet(false) => "Return voucher marked as missing".to_string(),
            Message::EquipmentClosed(order) => format!("OT {} closed", order),
            Message::DestinationUpdated => "Destination updated".to_string(),
            Message::EquipmentReopened(order) => format!("OT {} reopened", order),
            Message::ReopenNote(closed_at) => format!("Record reopened, closure of {} reverted", closed_at),
            Message::EquipmentExited(order) => format!("OT {} is now out of inventory", order),
            Message::ConfirmExit(order) => format!("Release OT {} from inventory? This cannot be undone", order),
            Message::ConfirmReopen(order) => format!("Reopen OT {}?", order),
            Message::ConfirmSendCloseNotice => "Send the closure notice now?".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::ValidationFailed(reason) => format!("Validation failed: {}", reason),
            Message::TransitionRefused(reason) => format!("Not allowed: {}", reason),
            Message::SelectExitCondition => "Exit condition".to_string(),
            Message::NoInterventions => "No interventions recorded".to_string(),
            Message::NoDocuments => "No documents filed".to_string(),
            Message::HistoryHeader => "Intervention history:".to_string(),
            Message::DocumentsHeader => "Documents:".to_string(),

            // === FILING MESSAGES ===
            Message::FileMissing(path) => format!("File not found: {}", path),
            Message::FileTooLarge(path, max_mb) => format!("{} is larger than the {} MB limit", path, max_mb),
            Message::FilePermissionDenied(path) => format!("Permission denied while filing {}", path),
            Message::FileCopyFailed(error) => format!("Could not file the document: {}", error),
            Message::FiledCopyRemoved(path) => format!("Removed {} after the database update failed", path),
            Message::NotAnImage(path) => format!("{} is not an image (jpg, jpeg, png, gif)", path),
            Message::OpeningDocument(path) => format!("Opening {}", path),
            Message::DocumentIndexOutOfRange(index) => format!("There is no document #{}", index),

            // === NOTIFICATION MESSAGES ===
            Message::ClosureNoticeRequiresClosed => "Close the record before sending the closure notice".to_string(),
            Message::OpeningComposeWindow => "Opening a pre-filled message in the browser; add the recipient there".to_string(),
            Message::MailSent(recipient) => format!("Message sent to {}", recipient),
            Message::SmtpNotConfigured => "SMTP transport selected but no SMTP settings found; run `eqtrack init`".to_string(),
            Message::BrowserOpenFailed(url) => format!("Could not open a browser. Compose link:\n{}", url),

            // === EXPORT / REPORT / STATISTICS MESSAGES ===
            Message::ExportCompleted(path) => format!("Exported to {}", path),
            Message::NothingToExport => "The list is empty, nothing to export".to_string(),
            Message::ReportGenerated(path) => format!("Report saved to {}", path),
            Message::NothingToReport => "No equipment in inventory to report".to_string(),
            Message::NoClosedRecords => "No closed equipment in inventory to chart".to_string(),
            Message::JobStarted(label) => format!("{} started", label),
            Message::JobFinished(label, detail) => format!("{} finished: {}", label, detail),
            Message::JobFailed(label, error) => format!("{} failed: {}", label, error),

            // === BACKUP MESSAGES ===
            Message::BackupCreated(path) => format!("Backup created: {}", path),
            Message::NoBackupsFound => "No backups found".to_string(),
            Message::BackupsHeader => "Available backups (newest first):".to_string(),
            Message::BackupRestored(path) => format!("Database restored from {}", path),
            Message::ConfirmRestore(path) => format!("Replace the current database with {}?", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration and stored password removed".to_string(),
            Message::ConfigModulePaths => "Storage paths".to_string(),
            Message::ConfigModulePolicy => "Inventory exit policy".to_string(),
            Message::ConfigModuleSmtp => "Notifications".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptCompanyName => "Company name (report header)".to_string(),
            Message::PromptDocsDir => "Documents directory".to_string(),
            Message::PromptBackupDir => "Backup directory".to_string(),
            Message::PromptMaxFileMb => "Maximum document size (MB)".to_string(),
            Message::PromptExitPolicy => "Document requirement for other exit conditions".to_string(),
            Message::PromptNotifyTransport => "How are notifications sent".to_string(),
            Message::PromptSmtpServer => "SMTP server".to_string(),
            Message::PromptSmtpPort => "SMTP port".to_string(),
            Message::PromptSmtpUser => "SMTP user".to_string(),
            Message::PromptSmtpFrom => "Sender address".to_string(),
            Message::PromptSmtpRecipient => "Notification recipient".to_string(),
            Message::PromptSmtpPassword => "SMTP password".to_string(),
        };
        write!(f, "{}", text)
    }
}
