//! Upload routes — REST surface over the simulator.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::record::UploadRecord;
use crate::services::upload::UploadError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitBody {
    pub name: String,
}

#[derive(Deserialize)]
pub struct RemoveQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// `GET /api/uploads` — all records in submission order.
pub async fn list_uploads(State(state): State<AppState>) -> Json<Vec<UploadRecord>> {
    Json(state.simulator.list().await)
}

/// `POST /api/uploads` — register a simulated upload.
pub async fn submit_upload(
    State(state): State<AppState>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<UploadRecord>), StatusCode> {
    let record = state
        .simulator
        .submit(&body.name)
        .await
        .map_err(upload_error_to_status)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/uploads/:id`
pub async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadRecord>, StatusCode> {
    state
        .simulator
        .get(id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `DELETE /api/uploads/:id` — idempotent; `removed` is 0 or 1.
pub async fn remove_upload(State(state): State<AppState>, Path(id): Path<Uuid>) -> Json<RemovedResponse> {
    let removed = usize::from(state.simulator.remove_record(id).await.is_some());
    Json(RemovedResponse { removed })
}

/// `DELETE /api/uploads?name=` — remove every record with that name.
pub async fn remove_uploads_by_name(
    State(state): State<AppState>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<RemovedResponse>, StatusCode> {
    let Some(name) = query.name else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let removed = state.simulator.remove(&name).await;
    info!(identifier = %name, removed, "rest: remove by name");
    Ok(Json(RemovedResponse { removed }))
}

pub(crate) fn upload_error_to_status(err: UploadError) -> StatusCode {
    match err {
        UploadError::EmptyIdentifier => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
