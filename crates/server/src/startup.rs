use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::auth::repo::seaorm::SeaOrmTokenRepository;
use service::auth::repository::memory::InMemoryTokenRepository;
use service::seed::seed_example_users;
use service::users::repo::seaorm::SeaOrmUserRepository;
use service::users::repository::{memory::InMemoryUserRepository, UserRepository};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Wire repositories and services. An empty `database.url` selects the
/// in-memory store; otherwise connect, ping and migrate.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    if !cfg.database.is_configured() {
        warn!(event = "in_memory_store", "database.url is empty; using in-memory repositories, data is lost on exit");
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        maybe_seed(cfg, users.as_ref()).await?;
        return Ok(ServerState::new(users, Arc::new(InMemoryTokenRepository::new()), cfg));
    }

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    models::db::ping(&db).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema is up to date");
    }
    let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
    maybe_seed(cfg, users.as_ref()).await?;
    Ok(ServerState::new(users, Arc::new(SeaOrmTokenRepository::new(db)), cfg))
}

async fn maybe_seed(cfg: &AppConfig, users: &dyn UserRepository) -> anyhow::Result<()> {
    if cfg.seed.example_users {
        let inserted = seed_example_users(users).await?;
        info!(event = "seed", inserted, "example users checked");
    }
    Ok(())
}

pub fn build_app(state: ServerState, cfg: &AppConfig) -> Router {
    routes::build_router(state, build_cors(), &cfg.server.frontend_dir)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_frontend(&cfg.server.frontend_dir).await;

    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
