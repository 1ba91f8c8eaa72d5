use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{parse_cli_args, run_agenda_mode, run_interactive, CliMode, USAGE};

use daybook::{
    app::AppState,
    calendar::store::EventStore,
    storage::{
        config::{Config, LoggingConfig, StorageBackend},
        open_repository,
    },
};

fn main() -> anyhow::Result<()> {
    let mut options = match parse_cli_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if options.mode == CliMode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = match options.config_path.take() {
        Some(path) => Config::load_or_create_at(&path),
        None => Config::load_or_create(),
    }
    .context("Failed to load configuration")?;

    let _guard = setup_logging(&config.logging);

    if options.ephemeral {
        config.storage.backend = StorageBackend::Memory;
    }
    let repository = open_repository(&config.storage)
        .with_context(|| format!("Failed to open storage at {}", config.storage.path.display()))?;
    let store = EventStore::load(repository);
    let mut app = AppState::new(store, config.form.clone());

    match options.mode {
        CliMode::AgendaDate(date) => run_agenda_mode(&mut app, date),
        _ => run_interactive(&mut app)?,
    }

    tracing::info!("daybook exiting");
    Ok(())
}

fn setup_logging(logging: &LoggingConfig) -> WorkerGuard {
    std::fs::create_dir_all(&logging.directory).ok();

    let file_appender = tracing_appender::rolling::daily(&logging.directory, "daybook.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!("daybook started");
    guard
}
