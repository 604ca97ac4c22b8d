//! Router assembly and the serve loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use folio_core::Result;

use crate::routes::{
    about_handler, comments_handler, comments_stream_handler, health_handler, landing_handler,
    post_comment_handler, project_handler, resume_handler,
};
use crate::state::AppState;

/// Extra room on top of the base64-inflated image for the rest of the body.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Builds the site router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    // Base64 inflates by 4/3; allow twice the image limit so oversized
    // images reach the size check and get a proper error.
    let body_limit = state.site.config().comments.max_image_bytes * 2 + BODY_OVERHEAD;

    Router::new()
        .route("/", get(landing_handler))
        .route("/project/{id}", get(project_handler))
        .route("/api/about", get(about_handler))
        .route(
            "/api/comments",
            get(comments_handler)
                .post(post_comment_handler)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/comments/stream", get(comments_stream_handler))
        .route("/resume", get(resume_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `bind:port` from the site configuration and serves until `shutdown`
/// resolves.
pub async fn serve_with_shutdown<F>(state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let site = &state.site.config().site;
    let address = format!("{}:{}", site.bind, site.port);
    tracing::info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(remote = state.site.remote().name(), "Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    serve_with_shutdown(state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
