//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP and websocket endpoints a browser rendering
//! layer uses: upload submit/remove/list, the live record stream, and the
//! literal report datasets. No file bytes cross this boundary.

pub mod reports;
pub mod uploads;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/uploads",
            get(uploads::list_uploads)
                .post(uploads::submit_upload)
                .delete(uploads::remove_uploads_by_name),
        )
        .route("/api/uploads/{id}", get(uploads::get_upload).delete(uploads::remove_upload))
        .route("/api/reports", get(reports::dashboard))
        .route("/api/reports/{kind}", get(reports::get_report))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
