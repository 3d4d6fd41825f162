use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;

use crate::server::{ApiResult, AppState, JsonResponse};
use crate::threat_log::{NewThreatLog, ThreatLog, ThreatLogPatch};

pub async fn list_logs(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ThreatLog>> {
    let logs = state.logs.read().await;
    Ok(Json(JsonResponse::ok(logs.list().to_vec())))
}

pub async fn create_log(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewThreatLog>, JsonRejection>,
) -> ApiResult<ThreatLog> {
    let Json(new) = payload?;
    let log = state.logs.write().await.add(new)?;
    info!("Threat log {} created ({})", log.id, log.severity);
    Ok(Json(JsonResponse::ok(log)))
}

pub async fn update_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ThreatLogPatch>, JsonRejection>,
) -> ApiResult<ThreatLog> {
    let Json(patch) = payload?;
    let log = state.logs.write().await.update(&id, patch)?;
    info!("Threat log {} updated", log.id);
    Ok(Json(JsonResponse::ok(log)))
}
