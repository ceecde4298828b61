//! Submission endpoint for API clients

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use std::sync::Arc;

use formbuilder_core::ForwardOutcome;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, SubmissionRequest, SubmissionResult};
use crate::routes::{client_context, parse_form_id};
use crate::ApiState;

/// Submit values for a form
#[utoipa::path(
    post,
    path = "/api/forms/{id}/submissions",
    params(("id" = u64, Path, description = "Form id")),
    request_body = SubmissionRequest,
    responses(
        (status = 200, body = SubmissionResult),
        (status = 400, description = "Required field missing"),
        (status = 404, description = "Form not found"),
        (status = 502, description = "Callback URL rejected the submission")
    ),
    tag = "submissions"
)]
pub async fn submit_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SubmissionResult>>> {
    let id = parse_form_id(&id)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = state.store.get(id).await?;

    let outcome = state
        .forwarder
        .submit(&form, request.data, request.callback_url.as_deref(), client_context(&headers))
        .await?;

    let message = match &outcome {
        ForwardOutcome::Delivered { .. } => "Submission forwarded",
        ForwardOutcome::Skipped => "Submission accepted; no callback URL configured",
    };
    Ok(Json(ApiResponse::with_message(
        SubmissionResult {
            forwarded: outcome.forwarded(),
            destination: outcome.destination().map(str::to_string),
        },
        message,
    )))
}
