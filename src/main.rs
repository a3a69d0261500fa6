//! tabwise - AI tab assistant
//!
//! Main entry point for the tabwise CLI.

mod app;
mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tabwise_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::app::App;
use crate::cli::{Cli, Commands};

fn log_dir(logging: &LoggingConfig) -> anyhow::Result<PathBuf> {
    Ok(match &logging.dir {
        Some(dir) => ConfigLoader::expand_path(dir),
        None => ConfigLoader::data_dir()?.join("logs"),
    })
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = log_dir(logging)?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("tabwise")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer on stderr so command output stays clean
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Log validation findings; errors stop every command except `config`,
/// which is how a broken file gets fixed.
fn check_config(config: &Config, command: &Commands) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    for err in &result.errors {
        error!("Config {}: {}", err.path, err.message);
    }

    if !result.is_valid() && !matches!(command, Commands::Config { .. }) {
        anyhow::bail!("Invalid configuration ({} error(s))", result.errors.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigLoader::default_path()?,
    };
    let config = ConfigLoader::load_or_default(&config_path)?;

    init_tracing(&config.logging)?;
    check_config(&config, &cli.command)?;

    let mutates_browser = cli.command.mutates_browser();
    let app = App::build(config, config_path, cli.state).await?;

    commands::run(&app, cli.command).await?;

    if mutates_browser {
        app.save_state().await?;
    }
    Ok(())
}
