use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::llm::{
    BriefingInput, BriefingOutput, SuggestResponseInput, SuggestResponseOutput, SummarizeInput,
    SummarizeOutput,
};
use crate::server::{ApiResult, AppState, JsonResponse};

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeInput>, JsonRejection>,
) -> ApiResult<SummarizeOutput> {
    let Json(input) = payload?;
    let output = state.flows.summarize_threat_data(&input).await?;
    Ok(Json(JsonResponse::ok(output)))
}

pub async fn suggest_response(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestResponseInput>, JsonRejection>,
) -> ApiResult<SuggestResponseOutput> {
    let Json(input) = payload?;
    let output = state.flows.suggest_response(&input).await?;
    Ok(Json(JsonResponse::ok(output)))
}

pub async fn briefing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BriefingInput>, JsonRejection>,
) -> ApiResult<BriefingOutput> {
    let Json(input) = payload?;
    let output = state.flows.generate_threat_briefing(&input).await?;
    Ok(Json(JsonResponse::ok(output)))
}
