//! JSON HTTP API
//!
//! Every response is wrapped in a [`JsonResponse`] envelope. Errors are
//! mapped onto status codes by [`ApiError`].

pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::alert_config::AlertConfigError;
use crate::llm::{FailureKind, FlowError};
use crate::threat_log::LogBookError;

pub use state::AppState;

/// JSON response wrapper
#[derive(Debug, Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Error type for HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    LogBook(#[from] LogBookError),
    #[error(transparent)]
    AlertConfig(#[from] AlertConfigError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Flow(e) => match e.kind() {
                FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                FailureKind::Transport | FailureKind::EmptyResult => StatusCode::BAD_GATEWAY,
            },
            ApiError::LogBook(LogBookError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::LogBook(LogBookError::MissingField(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::AlertConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(JsonResponse::<()>::err(self.to_string())),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<Json<JsonResponse<T>>, ApiError>;

/// Build the API router over shared state
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // AI flows
        .route("/api/flows/summarize", post(handlers::flows::summarize))
        .route(
            "/api/flows/suggest-response",
            post(handlers::flows::suggest_response),
        )
        .route("/api/flows/briefing", post(handlers::flows::briefing))
        // Threat logs
        .route(
            "/api/threat-logs",
            get(handlers::threat_logs::list_logs).post(handlers::threat_logs::create_log),
        )
        .route("/api/threat-logs/{id}", put(handlers::threat_logs::update_log))
        // Alert configuration
        .route(
            "/api/alert-config",
            get(handlers::alert_config::get_config).put(handlers::alert_config::save_config),
        )
        // Overview
        .route("/api/overview", get(handlers::overview::get_overview))
        .route("/api/health", get(handlers::overview::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until the process is stopped
pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Threat desk API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert_config::AlertConfig;
    use crate::llm::{
        CompletionRequest, CompletionResponse, FlowSet, LlmError, LlmProvider, ModelClient,
        ProviderType,
    };
    use crate::threat_log::ThreatLogBook;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug)]
    enum Reply {
        Text(&'static str),
        Down,
    }

    #[derive(Debug)]
    struct StubProvider(Reply);

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn provider_type(&self) -> ProviderType {
            ProviderType::Ollama
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            match self.0 {
                Reply::Text(text) => Ok(CompletionResponse {
                    text: text.to_string(),
                    ..Default::default()
                }),
                Reply::Down => Err(LlmError::Connection("connection refused".to_string())),
            }
        }
    }

    fn app(reply: Reply) -> Router {
        let flows = FlowSet::new(ModelClient::new(Arc::new(StubProvider(reply))));
        let state = AppState::new(flows, ThreatLogBook::seeded(), AlertConfig::default());
        create_router(Arc::new(state))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const SUMMARY: &str = r#"{"summary": "Brute-force login attempt detected.", "riskLevel": "high", "recommendations": "Lock account, block IP."}"#;

    #[tokio::test]
    async fn test_summarize_ok() {
        let (status, body) = send(
            app(Reply::Text(SUMMARY)),
            Method::POST,
            "/api/flows/summarize",
            Some(json!({"threatData": "5 failed logins from IP 10.0.0.5 in 2 minutes"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["riskLevel"], "high");
        assert_eq!(body["data"]["summary"], "Brute-force login attempt detected.");
    }

    #[tokio::test]
    async fn test_blank_input_is_422() {
        let (status, body) = send(
            app(Reply::Text(SUMMARY)),
            Method::POST,
            "/api/flows/briefing",
            Some(json!({"threatData": "  "})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("threatData"));
    }

    #[tokio::test]
    async fn test_invalid_output_is_422() {
        let (status, _) = send(
            app(Reply::Text(r#"{"summary": "s"}"#)),
            Method::POST,
            "/api/flows/summarize",
            Some(json!({"threatData": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_provider_failure_is_502() {
        let (status, body) = send(
            app(Reply::Down),
            Method::POST,
            "/api/flows/briefing",
            Some(json!({"threatData": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_empty_result_is_502() {
        let (status, _) = send(
            app(Reply::Text("")),
            Method::POST,
            "/api/flows/briefing",
            Some(json!({"threatData": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_threat_log_lifecycle() {
        let app = app(Reply::Down);

        let (status, body) = send(app.clone(), Method::GET, "/api/threat-logs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 4);

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/threat-logs",
            Some(json!({
                "threatDescription": "Credential stuffing against VPN",
                "severity": "High",
                "status": "Open"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "TL005");

        let (status, body) = send(
            app.clone(),
            Method::PUT,
            "/api/threat-logs/TL005",
            Some(json!({"status": "Resolved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "Resolved");

        let (_, body) = send(app.clone(), Method::GET, "/api/threat-logs", None).await;
        assert_eq!(body["data"][0]["id"], "TL005");

        let (status, _) = send(
            app,
            Method::PUT,
            "/api/threat-logs/TL404",
            Some(json!({"status": "Resolved"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_threat_log_missing_field_is_422() {
        let (status, body) = send(
            app(Reply::Down),
            Method::POST,
            "/api/threat-logs",
            Some(json!({"threatDescription": "x", "severity": "Low"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("status"));
    }

    #[tokio::test]
    async fn test_alert_config() {
        let app = app(Reply::Down);

        let (status, body) = send(app.clone(), Method::GET, "/api/alert-config", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cpuUsageThreshold"], 85);

        let mut update = body["data"].clone();
        update["cpuUsageThreshold"] = json!(120);
        let (status, _) = send(app.clone(), Method::PUT, "/api/alert-config", Some(update.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        update["cpuUsageThreshold"] = json!(70);
        let (status, _) = send(app.clone(), Method::PUT, "/api/alert-config", Some(update)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(app, Method::GET, "/api/alert-config", None).await;
        assert_eq!(body["data"]["cpuUsageThreshold"], 70);
    }

    #[tokio::test]
    async fn test_overview_and_health() {
        let app = app(Reply::Down);

        let (status, body) = send(app.clone(), Method::GET, "/api/overview", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 4);
        assert_eq!(body["data"]["openIncidents"], 1);

        let (status, body) = send(app, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["provider"], "stub");
        assert_eq!(body["data"]["providerType"], "ollama");
    }
}
