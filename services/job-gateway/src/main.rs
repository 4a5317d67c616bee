use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use jc_chain_client::WalletProvider;
use jc_chain_ethrpc::EthRpcProvider;
use jc_session::{ActivityLog, Session};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

mod config;
mod ops;

use config::GatewayConfig;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

pub(crate) type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub(crate) struct AppState {
    pub(crate) provider: Arc<dyn WalletProvider>,
    pub(crate) session: Mutex<Session>,
    pub(crate) log: ActivityLog,
    pub(crate) config: GatewayConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::from_env()?;
    let provider = Arc::new(EthRpcProvider::new(Some(config.rpc_url.clone())));
    let log = ActivityLog::new();

    // Load-time wallet probe: one log line either way. An unreachable
    // provider does not stop the gateway; operations fail defensively
    // until the endpoint comes back.
    match provider.client_version().await {
        Ok(client_version) => {
            log.append(format!("Wallet provider is available: {client_version}"))
                .await
        }
        Err(err) => {
            warn!("wallet provider probe failed: {err:#}");
            log.append(format!(
                "Wallet provider is not available at {}. Check the endpoint.",
                config.rpc_url
            ))
            .await;
        }
    }

    let listen_addr = config.listen_addr;
    let state = Arc::new(AppState {
        provider,
        session: Mutex::new(Session::default()),
        log,
        config,
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/connect", post(ops::connect))
        .route("/approve", post(ops::approve))
        .route("/run-job", post(ops::run_job))
        .route("/session", get(ops::session_snapshot))
        .route("/log", get(ops::activity_log))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("job-gateway listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "job-gateway",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "job-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}

pub(crate) fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
}

pub(crate) fn internal_error(err: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
