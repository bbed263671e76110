//! Axum web server implementation for hevy-tcx.

use std::net::SocketAddr;

use axum::{
    extract::{Request, State},
    http::{header, Method},
    response::Response,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::api::control_routes;
use super::state::WebAppState;
use crate::capture::ProxyError;

/// Path prefix of the routes answered locally; everything else is proxied.
pub const CONTROL_PREFIX: &str = "/_tcx";

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable CORS for browser pages on other origins (allows any origin).
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            cors_permissive: true,
        }
    }
}

/// Forward any non-control request upstream.
async fn proxy_fallback(
    State(state): State<WebAppState>,
    request: Request,
) -> Result<Response, ProxyError> {
    state.proxy().forward(request).await
}

/// Build the Axum router with all routes.
pub fn build_router(state: WebAppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION])
    } else {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest(CONTROL_PREFIX, control_routes())
        .fallback(proxy_fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
///
/// Starts the capture tasks and serves until Ctrl-C, then stops the tasks.
pub async fn run_server(state: WebAppState, config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let cancel = CancellationToken::new();
    let tasks = state.start_background(&cancel);
    let app = build_router(state, config.cors_permissive);

    tracing::info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl-C, shutting down");
                }
                _ = shutdown.cancelled() => {}
            }
        })
        .await?;

    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Background task ended abnormally");
        }
    }

    Ok(())
}
