//! Rankboard Server
//!
//! Seeds the ranking index, starts the synthetic load driver, and serves the
//! leaderboard over HTTP until interrupted.

use clap::{Arg, ArgAction, Command};
use rankboard::api::start_api_server;
use rankboard::core::{config, logging, AppState, Config, Error, Result};
use rankboard::sim::{rng_from, seed_entities, SyntheticLoadDriver};
use rankboard::system::metrics;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("rankboard")
        .version(rankboard::VERSION)
        .about("In-memory competition-ranked leaderboard.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("seed-count")
                .long("seed-count")
                .value_name("N")
                .help("Number of synthetic entities added at startup"),
        )
        .arg(
            Arg::new("no-simulation")
                .long("no-simulation")
                .action(ArgAction::SetTrue)
                .help("Do not start the synthetic load driver"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .get_matches();

    // Initialize logging; the configured level is applied once known
    let log_handle = logging::init_logging("info");

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = config::load_config_or_default(config_path)?;

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    if let Some(handle) = &log_handle {
        handle.set_level(&config.logging.level)?;
    }

    info!("Starting Rankboard v{}", rankboard::VERSION);
    if config.metrics.enable_prometheus {
        metrics::init_registry();
    }

    let app_state = Arc::new(AppState::from_config(config)?);
    info!("Ranking index created over score domain {}", app_state.index.domain());

    // Seed off the async workers; bulk load is N sequential adds
    let seed_count = app_state.config.seed.count;
    let seed_rng = app_state.config.seed.rng_seed;
    let index = Arc::clone(&app_state.index);
    tokio::task::spawn_blocking(move || seed_entities(&index, seed_count, &mut rng_from(seed_rng)))
        .await
        .map_err(|e| Error::server(format!("Seeding task failed: {}", e)))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start the load driver if enabled
    let driver_handle = if app_state.config.simulation.enabled {
        let driver =
            SyntheticLoadDriver::new(Arc::clone(&app_state.index), &app_state.config.simulation);
        Some(driver.spawn(shutdown_rx.clone()))
    } else {
        info!("Synthetic load driver disabled");
        None
    };

    // Start the HTTP server
    let mut server_shutdown = shutdown_rx.clone();
    let mut server_handle = tokio::spawn(start_api_server(Arc::clone(&app_state), async move {
        let _ = server_shutdown.wait_for(|&stop| stop).await;
    }));

    // Wait for shutdown signal
    let server_result = tokio::select! {
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, initiating graceful shutdown...");
            None
        }
        result = &mut server_handle => {
            warn!("HTTP server terminated unexpectedly");
            Some(result)
        }
    };

    let _ = shutdown_tx.send(true);

    if let Some(handle) = driver_handle {
        match handle.await {
            Ok(issued) => info!("Load driver issued {} updates", issued),
            Err(e) => warn!("Load driver task failed: {}", e),
        }
    }

    let server_result = match server_result {
        Some(result) => result,
        None => server_handle.await,
    };
    server_result.map_err(|e| Error::server(format!("HTTP server task failed: {}", e)))??;

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(count) = matches.get_one::<String>("seed-count") {
        config.seed.count = count
            .parse()
            .map_err(|e| Error::config(format!("Invalid seed count: {}", e)))?;
    }

    if matches.get_flag("no-simulation") {
        config.simulation.enabled = false;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
