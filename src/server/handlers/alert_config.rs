use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::alert_config::AlertConfig;
use crate::server::{ApiResult, AppState, JsonResponse};

pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult<AlertConfig> {
    let config = state.alerts.read().await.clone();
    Ok(Json(JsonResponse::ok(config)))
}

/// Replace the alert settings after range checks
pub async fn save_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AlertConfig>, JsonRejection>,
) -> ApiResult<AlertConfig> {
    let Json(config) = payload?;
    config.validate()?;

    *state.alerts.write().await = config.clone();
    info!("Alert configuration saved");

    Ok(Json(JsonResponse::ok(config)))
}
