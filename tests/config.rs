#[cfg(test)]
mod tests {
    use eqtrack::db::equipments::InventoryFilter;
    use eqtrack::libs::config::{Config, NotifyTransport, SmtpConfig};
    use eqtrack::libs::lifecycle::ExitPolicy;
    use eqtrack::libs::settings::ViewSettings;
    use eqtrack::libs::view::Column;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
        config_path: PathBuf,
        settings_path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config_path = temp_dir.path().join("config.json");
            let settings_path = temp_dir.path().join("ui_state.json");
            ConfigTestContext {
                _temp_dir: temp_dir,
                config_path,
                settings_path,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.config_path).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.max_file_mb, 50);
        assert_eq!(config.notify_transport, NotifyTransport::Web);
        assert_eq!(config.exit_policy, ExitPolicy::ConditionSpecific);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            company_name: "Taller Norte".to_string(),
            exit_policy: ExitPolicy::Strict,
            notify_transport: NotifyTransport::Smtp,
            smtp: Some(SmtpConfig {
                user: "bench@example.com".to_string(),
                recipient: "stores@example.com".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        config.save_to(&ctx.config_path).unwrap();

        let read = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(read, config);
        assert!(read.smtp.unwrap().is_complete());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_keeps_other_defaults(ctx: &mut ConfigTestContext) {
        fs::write(&ctx.config_path, r#"{"company_name":"Hangar 3","exit_policy":"strict"}"#).unwrap();

        let config = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(config.company_name, "Hangar 3");
        assert_eq!(config.exit_policy, ExitPolicy::Strict);
        assert_eq!(config.docs_dir, Config::default().docs_dir);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_broken_file_is_an_error(ctx: &mut ConfigTestContext) {
        fs::write(&ctx.config_path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.config_path).is_err());
    }

    #[test]
    fn test_environment_overrides_smtp() {
        std::env::set_var("SMTP_SERVER", "mail.example.com");
        std::env::set_var("SMTP_PORT", "2525");
        std::env::set_var("EMAIL_RECIPIENT", "ops@example.com");

        let mut config = Config::default();
        config.apply_env_overrides();

        std::env::remove_var("SMTP_SERVER");
        std::env::remove_var("SMTP_PORT");
        std::env::remove_var("EMAIL_RECIPIENT");

        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.server, "mail.example.com");
        assert_eq!(smtp.port, 2525);
        assert_eq!(smtp.recipient, "ops@example.com");
        assert!(!smtp.is_complete());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_view_settings_round_trip(ctx: &mut ConfigTestContext) {
        assert_eq!(ViewSettings::read_from(&ctx.settings_path), ViewSettings::default());

        let settings = ViewSettings {
            columns: vec![Column::Order, Column::Status, Column::Hours],
            default_filter: InventoryFilter::All,
            sort_column: Some(Column::Order),
        };
        settings.save_to(&ctx.settings_path).unwrap();
        assert_eq!(ViewSettings::read_from(&ctx.settings_path), settings);

        fs::write(&ctx.settings_path, "garbage").unwrap();
        assert_eq!(ViewSettings::read_from(&ctx.settings_path), ViewSettings::default());
    }
}
