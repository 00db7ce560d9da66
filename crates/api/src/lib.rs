//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET    /jobs?status=&company=&search=
//!   POST   /jobs
//!   POST   /jobs/bulk
//!   DELETE /jobs/bulk
//!   GET    /jobs/{id}
//!   PATCH  /jobs/{id}
//!   DELETE /jobs/{id}
//!   GET    /stats
//!   GET    /healthz

pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use db::DbPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use error::ApiError;

/// Shared handler state. Cloning is cheap; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build the application router around an already opened pool.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/jobs",
            get(handlers::jobs::list).post(handlers::jobs::create),
        )
        .route(
            "/jobs/bulk",
            post(handlers::jobs::bulk_create).delete(handlers::jobs::bulk_delete),
        )
        .route(
            "/jobs/{id}",
            get(handlers::jobs::get)
                .patch(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .route("/stats", get(handlers::stats::get))
        .route("/healthz", get(handlers::probes::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(bind: &str, pool: DbPool) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(pool)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl+c: {e}");
        std::future::pending::<()>().await;
    }
    info!("received ctrl+c interrupt, closing server");
}

#[cfg(test)]
mod routes_tests;
