use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::overview::Overview;
use crate::server::{ApiResult, AppState, JsonResponse};

pub async fn get_overview(State(state): State<Arc<AppState>>) -> ApiResult<Overview> {
    let logs = state.logs.read().await;
    Ok(Json(JsonResponse::ok(Overview::from_logs(logs.list()))))
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    let provider = state.flows.summarize.client().provider();
    Ok(Json(JsonResponse::ok(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": provider.name(),
        "providerType": provider.provider_type(),
        "model": provider.model(),
    }))))
}
