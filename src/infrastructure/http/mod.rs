use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health,
    tts::{TtsController, MAX_TTS_BODY_BYTES},
};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Any origin may call the relay, with GET/POST and only the Content-Type header
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router: the relay endpoint, a liveness check and
/// static assets served from `static_dir` for every other path.
pub fn build_router(static_dir: &Path, tts_controller: Arc<TtsController>) -> Router {
    let tts_routes = Router::new()
        .route("/tts", post(TtsController::synthesize))
        .layer(DefaultBodyLimit::max(MAX_TTS_BODY_BYTES))
        .with_state(tts_controller);

    Router::new()
        .route("/health", get(health::health))
        .merge(tts_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_http_server(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config.static_dir, tts_controller);

    // HOST only names the public URL, the listener always binds every interface
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Server failed to start");
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Please stop other services using this port.",
                    config.port
                );
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        "Server running on http://{}:{} (listening on {})",
        config.host,
        config.port,
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
