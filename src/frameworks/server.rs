// Framework bootstrap for the arena server runtime.

use crate::domain::tuning::ArenaTuning;
use crate::frameworks::config;
use crate::interface_adapters::net::{
    ConnectionHub, outbound_dispatcher, status_handler, ws_handler,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::{Arena, WorldSettings, world_task};

use axum::{Router, routing::get};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc, time::Instant};
use tokio::sync::{Notify, mpsc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the arena on an already-bound listener until Ctrl-C.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let shutdown = Arc::new(Notify::new());
    let state = build_state(shutdown.clone());

    // Start the Web Server
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::bind_addr(), config::http_port());

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(shutdown: Arc<Notify>) -> Arc<AppState> {
    let (game_tx, game_rx) = mpsc::channel(config::GAME_EVENT_CHANNEL_CAPACITY);
    let (outbound_tx, outbound_rx) = mpsc::channel(config::OUTBOUND_CHANNEL_CAPACITY);
    let hub = Arc::new(ConnectionHub::new(config::CLIENT_QUEUE_CAPACITY));

    let settings = WorldSettings {
        tick_interval: config::tick_interval(),
        broadcast_interval: config::broadcast_interval(),
    };
    let arena = Arena::new(SystemClock, StdRng::from_entropy(), ArenaTuning::default());

    // Spawn the world task; it is the only owner of arena state.
    tokio::spawn(world_task(arena, game_rx, outbound_tx, settings, shutdown));
    // Serialization and fan-out live in the adapter layer.
    tokio::spawn(outbound_dispatcher(outbound_rx, hub.clone()));

    Arc::new(AppState {
        game_tx,
        hub,
        started_at: Instant::now(),
    })
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    shutdown.notify_one();
}
