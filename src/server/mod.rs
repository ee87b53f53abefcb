//! Server: Axum HTTP API for valuations, onboarding drafts and Studio jobs.
//!
//! CORS is open so the browser wizard can run from a separate origin.

pub mod extract;
pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/valuation",
            get(routes::get_valuation).post(routes::post_valuation),
        )
        .route("/api/drafts", post(routes::create_draft))
        .route(
            "/api/drafts/:id",
            get(routes::get_draft).delete(routes::delete_draft),
        )
        .route("/api/drafts/:id/profile", put(routes::put_profile))
        .route("/api/drafts/:id/horse", put(routes::put_horse))
        .route("/api/drafts/:id/lease", put(routes::put_lease))
        .route("/api/drafts/:id/term-sheet", post(routes::post_term_sheet))
        .route("/api/drafts/:id/submission", get(routes::get_submission))
        .route("/api/studio/jobs/:id", get(routes::get_studio_job))
        .route(
            "/api/studio/jobs/:id/completion",
            get(routes::await_studio_job),
        )
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Bind `port` and serve until Ctrl-C.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind server port {port}"))?;
    info!(port, "Server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
