//! Solaris Sync - command line entry point
//!
//! Loads a game either from the server (reusing the on-disk cache) or from
//! an offline dump, optionally writes it back out as a dump, and logs a
//! short summary. Everything is configured through environment variables.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solaris_sync::config::{Config, Mode};
use solaris_sync::load::{self, LoadedGame};
use solaris_sync::log::{Logger, TracingLogger};
use solaris_sync::SolarisClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Solaris Sync");
    info!("Server: {}", config.base_url);

    let game = tokio::select! {
        game = run(&config) => game?,
        _ = shutdown_signal() => {
            info!("Interrupted, abandoning sync");
            return Ok(());
        }
    };

    if let Some(dir) = &config.dump_dir {
        load::dump_game(&TracingLogger, dir, &game)?;
    }

    summarize(&game);
    Ok(())
}

async fn run(config: &Config) -> anyhow::Result<LoadedGame> {
    let log: Arc<dyn Logger> = Arc::new(TracingLogger);

    match config.mode()? {
        Mode::Offline { dir } => Ok(load::load_offline(log.as_ref(), &dir)?),
        Mode::Online {
            email,
            password,
            game,
        } => {
            let mut client = SolarisClient::connect(
                log.clone(),
                config.base_url.clone(),
                config.timeout,
                config.cache_dir.clone(),
            )?;
            client.load_cache()?;
            client.login(&email, &password).await?;

            let info = client
                .find_game(&game)
                .await?
                .with_context(|| format!("game {} not found", game))?;

            Ok(load::load_online(log.as_ref(), &mut client, &info).await?)
        }
    }
}

fn summarize(game: &LoadedGame) {
    let me = game
        .me()
        .map(|p| p.to_string())
        .unwrap_or_else(|| game.me_player_id.clone());

    info!(
        game = %game.game_sync.name(),
        tick = game.current_tick(),
        me = %me,
        snapshots = game.sync_history.len(),
        intel_ticks = game.game_intel.len(),
        events = game.game_events.events.len(),
        "Loaded game"
    );
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
