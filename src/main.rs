use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use autoscaler::client::HttpAppClient;
use autoscaler::logging::{LogGuard, RotatingFileWriter, RotationPolicy, SharedWriter, write_record};
use autoscaler::scaler::{ControlLoop, CycleOutcome};

mod cli;
mod config;

use cli::Cli;
use config::Config;

fn setup_logging(log_file: &Path, policy: RotationPolicy, level: &str) -> Result<LogGuard> {
    let writer = SharedWriter::new(RotatingFileWriter::open(log_file, policy).context("Failed to open log file")?);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(Box::new(writer.clone())))
        .write_style(env_logger::WriteStyle::Never)
        .format(|buf, record| write_record(buf, &chrono::Local::now(), record))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(LogGuard::new(writer))
}

/// Install SIGINT and SIGTERM handlers now; the returned future resolves on either.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("Received SIGINT, stopping after the current cycle"),
            _ = terminate.recv() => info!("Received SIGTERM, stopping after the current cycle"),
        }
    })
}

/// Ctrl-C listener; registered when `run_until` first polls it, before any cycle.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, stopping after the current cycle"),
            Err(e) => {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    })
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    let scaler_config = config.scaler_config().context("Invalid scaler configuration")?;
    let client = Arc::new(
        HttpAppClient::new(&scaler_config.base_url, config.http_config()).context("Failed to build HTTP client")?,
    );

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }
    if scaler_config.dry_run {
        println!("{}", "Dry run: replica counts will not be written".yellow());
    }

    let mut control = ControlLoop::new(client.clone(), client, scaler_config);

    if cli.once {
        let outcome = control.run_cycle().await;
        info!("Single cycle finished: {:?}", outcome);
        match outcome {
            CycleOutcome::FetchFailed(e) => println!("{} {}", "Fetch failed:".red(), e),
            CycleOutcome::UpdateFailed { error, .. } => println!("{} {}", "Update failed:".red(), error),
            other => println!("{} {:?}", "Cycle:".green(), other),
        }
        return Ok(());
    }

    println!(
        "{} {} (logging to {})",
        "Autoscaling".cyan(),
        control.config().base(),
        config.log_path().display()
    );
    let shutdown = shutdown_signal()?;
    control.run_until(shutdown).await;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then let flags override it
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    let _log_guard = setup_logging(&config.log_path(), config.rotation_policy(), config.log_level())
        .context("Failed to setup logging")?;

    match &config.source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
