//! HTTP request handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::server::state::ServerState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "autodeployd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Trigger query parameters
#[derive(Debug, Deserialize)]
pub struct TriggerParams {
    /// A missing key matches no definition
    pub key: Option<String>,
}

/// Deployment trigger handler.
///
/// 200 when no definition matches the key, 202 once an execution attempt
/// has completed (regardless of per-line failures), 500 when the lookup or
/// the session establishment fails. No response body in any case.
pub async fn trigger_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<TriggerParams>,
) -> StatusCode {
    let _permit = match state.gate.admit().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("Admission failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let Some(key) = params.key else {
        return StatusCode::OK;
    };

    let matches = match state.store.find_by_key(&key).await {
        Ok(matches) => matches,
        Err(e) => {
            error!("Definition lookup for key '{}' failed: {}", key, e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    // Key uniqueness is not enforced by the store; only the first match runs
    let Some(deployment) = matches.into_iter().next() else {
        return StatusCode::OK;
    };

    info!(
        "A deployment job ({}) was found and will be executed...",
        deployment.display_name()
    );
    match state.engine.execute(&deployment).await {
        Ok(result) => {
            info!(
                "The deployment job ({}) has been completed, {}/{} lines succeeded.",
                deployment.display_name(),
                result.outcomes.len() - result.failed_count(),
                result.outcomes.len()
            );
            StatusCode::ACCEPTED
        }
        Err(e) => {
            error!(
                "The deployment job ({}) could not be executed: {}",
                deployment.display_name(),
                e
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
