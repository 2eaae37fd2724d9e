//! Request handlers for the JSON API.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use sitespec_core::{Analyzer, SitespecError, ensure_scheme};
use tokio::task::{self, JoinError};
use uuid::Uuid;

/// Shared handler state.
pub struct AppState {
    pub analyzer: Analyzer,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Failures surfaced to API clients.
#[derive(Debug)]
pub enum ApiError {
    MissingUrl,
    InvalidBody(JsonRejection),
    Analysis(SitespecError),
    Worker(JoinError),
}

/// Messages of `err` and each of its sources, outermost first.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingUrl => (StatusCode::BAD_REQUEST, json!({ "error": "URL is required" })),
            ApiError::InvalidBody(rejection) => (StatusCode::BAD_REQUEST, json!({ "error": rejection.body_text() })),
            ApiError::Analysis(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string(), "trace": error_chain(&err) }),
            ),
            ApiError::Worker(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "analysis worker failed", "trace": error_chain(&err) }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /analyze`: runs a full analysis of the requested URL.
pub async fn analyze(
    State(state): State<Arc<AppState>>, payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(ApiError::InvalidBody)?;
    let url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => ensure_scheme(url),
        _ => return Err(ApiError::MissingUrl),
    };

    let request_id = Uuid::new_v4();
    let started = Instant::now();
    tracing::info!(%request_id, %url, "analysis requested");

    let outcome = {
        let url = url.clone();
        task::spawn_blocking(move || state.analyzer.analyze(&url))
    }
    .await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(Ok(result)) => {
            tracing::info!(%request_id, %url, elapsed_ms, links = result.links.len(), "analysis finished");
            Ok(Json(result).into_response())
        }
        Ok(Err(err)) => {
            tracing::warn!(%request_id, %url, elapsed_ms, error = %err, "analysis failed");
            Err(ApiError::Analysis(err))
        }
        Err(err) => {
            tracing::error!(%request_id, %url, error = %err, "analysis worker panicked");
            Err(ApiError::Worker(err))
        }
    }
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
