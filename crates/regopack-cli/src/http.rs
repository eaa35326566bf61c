//! HTTP binding of the analyzer service.
//!
//! Maps routes onto [`PackContext`] calls and domain errors onto structured
//! error bodies. Evaluation runs on the blocking pool so slow rules never
//! stall the async workers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use regopack_app::PackContext;
use regopack_domain::AnalyzeError;
use regopack_engine::RegoEngine;
use regopack_types::{
    AnalyzeRequest, AnalyzeResponse, AnalyzeStackRequest, AnalyzerInfo, ConfigureRequest,
    PluginInfo,
};
use std::sync::Arc;
use thiserror::Error;

pub type SharedContext = Arc<PackContext<RegoEngine>>;

/// Request failure, rendered as `{"error": {"code", "message"}}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request carried a value the rules cannot receive.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AnalyzeError> for AppError {
    fn from(err: AnalyzeError) -> Self {
        match err {
            AnalyzeError::Translate(e) => AppError::Validation(e.to_string()),
            AnalyzeError::Evaluate(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub fn create_router(ctx: SharedContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/analyze", post(analyze))
        .route("/v1/analyze-stack", post(analyze_stack))
        .route("/v1/analyzer-info", get(analyzer_info))
        .route("/v1/plugin-info", get(plugin_info))
        .route("/v1/configure", post(configure))
        .route("/v1/cancel", post(cancel))
        .with_state(ctx)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn analyze(
    State(ctx): State<SharedContext>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let resp = tokio::task::spawn_blocking(move || ctx.analyze(&req))
        .await
        .map_err(|e| AppError::Internal(format!("analysis task failed: {e}")))??;
    Ok(Json(resp))
}

async fn analyze_stack(
    State(ctx): State<SharedContext>,
    Json(req): Json<AnalyzeStackRequest>,
) -> Json<AnalyzeResponse> {
    Json(ctx.analyze_stack(&req))
}

async fn analyzer_info(State(ctx): State<SharedContext>) -> Json<AnalyzerInfo> {
    Json(ctx.analyzer_info())
}

async fn plugin_info(State(ctx): State<SharedContext>) -> Json<PluginInfo> {
    Json(ctx.plugin_info())
}

async fn configure(
    State(ctx): State<SharedContext>,
    Json(req): Json<ConfigureRequest>,
) -> StatusCode {
    ctx.configure(&req);
    StatusCode::NO_CONTENT
}

async fn cancel(State(ctx): State<SharedContext>) -> StatusCode {
    ctx.cancel();
    StatusCode::NO_CONTENT
}
