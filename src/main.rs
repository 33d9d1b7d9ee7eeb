//! ClassPulse Server — real-time backbone of the learning platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use classpulse_core::config::{AppConfig, DatabaseProvider};
use classpulse_core::error::AppError;
use classpulse_core::traits::tagger::{SketchTagger, TagGenerator};
use classpulse_database::Repositories;
use classpulse_realtime::hub::RealtimeHub;
use classpulse_service::note::service::NoteService;
use classpulse_service::poll::service::PollService;
use classpulse_service::tags::client::HttpTagClient;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLASSPULSE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClassPulse v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Repositories ─────────────────────────────────────
    let repositories = match config.database.provider {
        DatabaseProvider::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = classpulse_database::connection::create_pool(&config.database).await?;
            classpulse_database::migration::run_migrations(&pool).await?;
            Repositories::postgres(pool)
        }
        DatabaseProvider::Memory => {
            tracing::info!("Using in-memory persistence");
            Repositories::memory()
        }
    };

    // ── Step 2: AI collaborators ─────────────────────────────────
    let (tagger, sketch_tagger): (
        Option<Arc<dyn TagGenerator>>,
        Option<Arc<dyn SketchTagger>>,
    ) = if config.ai.enabled {
        tracing::info!(base_url = %config.ai.base_url, "Tag service enabled");
        let client = Arc::new(HttpTagClient::new(&config.ai)?);
        let tagger: Arc<dyn TagGenerator> = client.clone();
        let sketch_tagger: Arc<dyn SketchTagger> = client;
        (Some(tagger), Some(sketch_tagger))
    } else {
        tracing::info!("Tag service disabled, using local keyword fallback");
        (None, None)
    };

    // ── Step 3: Real-time hub ────────────────────────────────────
    let hub = Arc::new(RealtimeHub::new(config.realtime.clone()));
    hub.start();

    // ── Step 4: Services ─────────────────────────────────────────
    let poll_service = Arc::new(PollService::new(
        Arc::clone(&repositories.polls),
        Arc::clone(&repositories.votes),
        Arc::clone(&repositories.contents),
        Arc::clone(hub.dispatcher()),
        tagger,
        config.realtime.default_poll_timer_seconds as i64,
    ));
    let note_service = Arc::new(NoteService::new(
        Arc::clone(&repositories.notes),
        Arc::clone(&repositories.contributions),
        Arc::clone(hub.dispatcher()),
        sketch_tagger,
    ));
    tracing::info!("Services initialized");

    // ── Step 5: HTTP server ──────────────────────────────────────
    let app_state = classpulse_api::state::AppState {
        config: Arc::new(config.clone()),
        hub: Arc::clone(&hub),
        poll_service,
        note_service,
    };

    let app = classpulse_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("ClassPulse server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Drain the hub ────────────────────────────────────
    hub.shutdown().await;

    tracing::info!("ClassPulse server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
