use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{http::HeaderName, Router};
use common::utils::logging::init_logging;
use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use service::auth::AuthConfig;
use service::image_host::ImgBbClient;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(3600))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Router over an already-built state, sized by `cfg.server`.
pub fn build_app(state: ServerState, cfg: &AppConfig) -> Router {
    routes::build_router(state, build_cors(), cfg.server.max_upload_bytes)
}

/// Connect, migrate and wire the SeaORM-backed services.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let images = ImgBbClient::new(&cfg.image_host).map_err(|e| StartupError::ImageHost(e.to_string()))?;
    if cfg.image_host.api_key.trim().is_empty() {
        tracing::warn!("image_host.api_key is empty; hotel uploads will be rejected by the host");
    }
    Ok(ServerState::with_seaorm(db, Arc::new(images), AuthConfig::from_settings(&cfg.auth)))
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_with_config<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, db_sqlite = cfg.database.is_sqlite(), "hotel booking api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server drained");
    Ok(())
}

/// Load `.env` and config, set up logging, serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;
    init_logging(cfg.logging.format == LogFormat::Json);
    run_with_config(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
