use eqtrack::commands::{report_error, Cli};
use eqtrack::libs::config::Config;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Daily-rolling file sink at the configured level, plus warnings on stderr.
/// `RUST_LOG` overrides both filters. The guard must live until exit so
/// buffered lines reach the file.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::WARN.into()));
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false).with_filter(console_filter);

    let log_path = config.log_path();
    let file_layer = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(name)) if std::fs::create_dir_all(dir).is_ok() => {
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
            Some((fmt::layer().with_writer(writer).with_ansi(false).with_filter(filter), guard))
        }
        _ => None,
    };
    let (file_layer, guard) = match file_layer {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file_layer).init();
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = Config::read().unwrap_or_default();
    let _guard = init_tracing(&config);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "eqtrack starting");

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
