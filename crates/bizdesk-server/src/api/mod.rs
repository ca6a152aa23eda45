//! HTTP surface: router assembly, service endpoints and the server loop

pub mod extract;
pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{signal, sync::oneshot};
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::audit::PgAuditStore;
use crate::config::Config;
use crate::features::{self, attendance::PgAttendanceStore, FeatureState};
use crate::middleware;

/// Build the PostgreSQL-backed feature state
pub fn pg_state(pool: PgPool, config: &Config) -> FeatureState {
    FeatureState {
        audit: Arc::new(PgAuditStore::new(pool.clone())),
        attendance: Arc::new(PgAttendanceStore::new(pool)),
        audit_config: config.audit,
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let service_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state.clone());

    service_routes
        .nest("/api", features::router(state))
        // Layers apply bottom-up: CORS sees the request first
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

pub async fn serve(pool: PgPool, config: Config) -> anyhow::Result<()> {
    let app = create_router(pg_state(pool, &config), &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    });

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    run_until_drained(server.into_future(), signalled_rx, drain_timeout).await?;

    info!("Server shut down");

    Ok(())
}

/// Drive `server` to completion, giving in-flight requests at most
/// `drain_timeout` once a shutdown signal has been received.
async fn run_until_drained<F>(
    server: F,
    signalled: oneshot::Receiver<()>,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result,
        Ok(()) = signalled => {
            info!(timeout_secs = drain_timeout.as_secs(), "Draining open connections");
            match tokio::time::timeout(drain_timeout, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Connections still open after shutdown timeout, closing them");
                    Ok(())
                },
            }
        },
    }
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Bizdesk Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Database connectivity probe
async fn health(State(state): State<FeatureState>) -> Response {
    match state.audit.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "disconnected" })),
            )
                .into_response()
        },
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received terminate signal, starting graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = FeatureState {
            audit: Arc::new(MemoryAuditStore::default()),
            attendance: Arc::new(MemoryAttendanceStore::default()),
            audit_config: Default::default(),
        };
        create_router(state, &Config::default())
    }

    #[tokio::test]
    async fn test_health_reports_connected_store() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"], "connected");
    }

    #[tokio::test]
    async fn test_root_reports_version() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_is_bounded_by_timeout() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        let started = tokio::time::Instant::now();
        let result = run_until_drained(
            std::future::pending::<std::io::Result<()>>(),
            rx,
            Duration::from_secs(30),
        )
        .await;

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_finishes_early_when_server_stops() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        let started = tokio::time::Instant::now();
        let server = async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        };
        run_until_drained(server, rx, Duration::from_secs(30))
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_server_exit_without_signal() {
        let (_tx, rx) = oneshot::channel::<()>();
        let result = run_until_drained(
            async { Err(std::io::Error::other("listener closed")) },
            rx,
            Duration::from_secs(30),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_api_routes_are_mounted() {
        let response = app()
            .oneshot(get_as("/api/audit/stats", &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(get_as("/api/nothing-here", &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
