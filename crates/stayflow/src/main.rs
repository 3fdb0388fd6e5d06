mod cli;

use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stayflow_core::{Room, StayStore, SyncOrchestrator};

use crate::cli::{Cli, Command};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] stayflow_config::ConfigError),

    #[error(transparent)]
    Core(#[from] stayflow_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => stayflow_config::load_config_from(path)?,
        None => stayflow_config::load_config_or_default(),
    };

    let store = Arc::new(StayStore::new());
    for seed in &config.rooms {
        store.add_room(Room::new(seed.number.clone(), seed.room_type.clone()));
    }

    let transport = stayflow_config::transport_from(&config);
    let orchestrator = SyncOrchestrator::new(Arc::clone(&store), transport);
    orchestrator.refresh_sources(stayflow_config::load_sources(&config)?)?;

    match cli.command {
        Command::Sync { source } => {
            let report = orchestrator.sync_source(&source).await?;
            println!("{}: {}", report.source, report.summary);
        }

        Command::TestConnection { source } => {
            let probe = orchestrator.test_connection(&source).await?;
            if probe.ok {
                println!("{}: ok ({} ms)", probe.source, probe.latency_ms);
            } else {
                println!(
                    "{}: failed ({} ms): {}",
                    probe.source,
                    probe.latency_ms,
                    probe.message.unwrap_or_default()
                );
            }
        }

        Command::Status => {
            let status = orchestrator.integration_status();
            println!(
                "{} sources configured, {} active",
                status.total_sources, status.active_sources
            );
            if status.recent_failures.is_empty() {
                println!("no recent failures");
            } else {
                println!("recent failures:");
                for entry in &status.recent_failures {
                    println!(
                        "  {} {} {}: {}",
                        entry.timestamp, entry.source, entry.operation, entry.detail
                    );
                }
            }
        }

        Command::Run => {
            orchestrator.start().await;
            info!("daemon running, Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            info!("shutting down");
            orchestrator.shutdown().await;
        }
    }

    Ok(())
}
