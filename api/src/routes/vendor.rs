//! Prompt.io diagnostics and schema proxy

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, EnvironmentReport, EnvironmentResponse};
use crate::routes::request_host;
use crate::ApiState;

/// Which vendor settings are present, without their values
#[utoipa::path(
    get,
    path = "/api/test-env",
    responses((status = 200, body = EnvironmentResponse)),
    tag = "vendor"
)]
pub async fn test_env(State(state): State<Arc<ApiState>>) -> Json<EnvironmentResponse> {
    let vendor = &state.config.vendor;
    let subdomain = vendor
        .subdomain
        .as_deref()
        .map(|s| format!("{}...", s.chars().take(3).collect::<String>()))
        .unwrap_or_else(|| "undefined".into());

    Json(EnvironmentResponse {
        success: true,
        environment: EnvironmentReport {
            has_subdomain: vendor.subdomain.is_some(),
            has_api_key: vendor.api_key.is_some(),
            subdomain,
            api_key_length: vendor.api_key.as_ref().map_or(0, String::len),
            backend: state.store.backend(),
        },
    })
}

/// Forward a payload to the configured Prompt.io data schema
#[utoipa::path(
    post,
    path = "/api/save-to-schema",
    request_body = Value,
    responses(
        (status = 200, description = "Vendor response, wrapped"),
        (status = 502, description = "Prompt.io rejected the payload"),
        (status = 503, description = "Vendor credentials missing")
    ),
    tag = "vendor"
)]
pub async fn save_to_schema(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let credentials = state.config.vendor_credentials(request_host(&headers))?;
    let client = state.config.prompt_io_client(&credentials)?;
    tracing::info!(subdomain = %credentials.masked_subdomain(), schema_id = state.config.vendor.schema_id, "saving payload to schema");

    let data = client.save_schema(state.config.vendor.schema_id, &payload).await?;
    Ok(Json(ApiResponse::success(data)))
}
