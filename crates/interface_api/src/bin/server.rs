//! Dispute Engine - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory store
//! cargo run --bin dispute-api
//!
//! # PostgreSQL store
//! API_STORE_BACKEND=postgres API_DATABASE_URL=postgres://... cargo run --bin dispute-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_STORE_BACKEND` - `memory` or `postgres` (default: memory)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_SWEEP_INTERVAL_SECS` - Background overdue sweep period, 0 to disable (default: 3600)
//! * `API_ENGINE__ESCALATION__MAX_ATTEMPTS` and friends - Engine policy overrides
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Actor, Role, SystemClock, UserId};
use domain_claims::{DisputeService, DisputeStore, InMemoryDisputeStore};
use infra_db::PostgresDisputeStore;
use interface_api::config::{ApiConfig, StoreBackend};
use interface_api::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Starting dispute engine API server"
    );

    let store = create_store(&config).await?;
    let service = Arc::new(
        DisputeService::new(store, Arc::new(SystemClock)).with_settings(config.engine.clone()),
    );

    if config.sweep_interval_secs > 0 {
        tokio::spawn(run_sweeper(
            Arc::clone(&service),
            Duration::from_secs(config.sweep_interval_secs),
        ));
    }

    let app = create_router(service, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Builds the configured dispute store.
async fn create_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn DisputeStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; disputes are lost on restart");
            Ok(Arc::new(InMemoryDisputeStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = infra_db::create_pool_from_url(&config.database_url)
                .await
                .context("failed to connect to PostgreSQL")?;
            infra_db::run_migrations(&pool)
                .await
                .context("failed to apply the dispute schema")?;
            Ok(Arc::new(PostgresDisputeStore::new(pool)))
        }
    }
}

/// Periodically advances overdue compliances.
///
/// Reads apply the same evaluation; the sweep covers compliances nobody reads.
async fn run_sweeper(service: Arc<DisputeService>, period: Duration) {
    let system = Actor::new(UserId::new(), Role::Admin, "system@dispute-engine.local");
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match service.sweep_overdue(&system).await {
            Ok(report) if !report.failed.is_empty() => {
                tracing::error!(
                    evaluated = report.evaluated,
                    advanced = report.advanced.len(),
                    failed = report.failed.len(),
                    "background sweep left compliances unevaluated"
                );
            }
            Ok(report) if !report.advanced.is_empty() => {
                tracing::info!(
                    evaluated = report.evaluated,
                    advanced = report.advanced.len(),
                    "background sweep advanced compliances"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "background sweep failed"),
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
