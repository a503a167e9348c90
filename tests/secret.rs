#[cfg(test)]
mod tests {
    use eqtrack::libs::secret::{Secret, SMTP_PASSWORD_ENV};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SecretTestContext {
        _temp_dir: TempDir,
        secret: Secret,
    }

    impl TestContext for SecretTestContext {
        fn setup() -> Self {
            std::env::remove_var(SMTP_PASSWORD_ENV);
            let temp_dir = tempfile::tempdir().unwrap();
            let secret = Secret::with_path(temp_dir.path().join(".smtp_secret"), "SMTP password");
            SecretTestContext { _temp_dir: temp_dir, secret }
        }
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_store_and_read_back(ctx: &mut SecretTestContext) {
        assert_eq!(ctx.secret.get(), None);

        ctx.secret.store("hunter2 with spaces").unwrap();

        assert_eq!(ctx.secret.get().as_deref(), Some("hunter2 with spaces"));
        let on_disk = fs::read_to_string(ctx.secret.path()).unwrap();
        assert!(!on_disk.contains("hunter2"));
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_clear_removes_file(ctx: &mut SecretTestContext) {
        ctx.secret.store("pw").unwrap();
        ctx.secret.clear().unwrap();

        assert!(!ctx.secret.path().exists());
        assert_eq!(ctx.secret.get(), None);
        ctx.secret.clear().unwrap();
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_corrupted_file_reads_as_missing(ctx: &mut SecretTestContext) {
        fs::write(ctx.secret.path(), "invalid_base64_content!@#$").unwrap();
        assert_eq!(ctx.secret.get(), None);
    }
}
