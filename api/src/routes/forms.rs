//! Form management endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use formbuilder_core::{Form, FormDraft, FormPatch};

use crate::error::{ApiError, ApiResult};
use crate::models::ApiResponse;
use crate::routes::{embed, parse_form_id, submissions};
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/:id", get(get_form).put(update_form).delete(delete_form))
        .route("/:id/embed-code", get(embed::embed_code))
        .route("/:id/submissions", post(submissions::submit_form))
}

/// List all forms
#[utoipa::path(
    get,
    path = "/api/forms",
    responses((status = 200, description = "All forms in creation order", body = [Form])),
    tag = "forms"
)]
pub async fn list_forms(State(state): State<Arc<ApiState>>) -> ApiResult<Json<ApiResponse<Vec<Form>>>> {
    let forms = state.store.list().await?;
    Ok(Json(ApiResponse::success(forms)))
}

/// Create a form
#[utoipa::path(
    post,
    path = "/api/forms",
    request_body = FormDraft,
    responses(
        (status = 201, description = "Form created", body = Form),
        (status = 400, description = "Invalid form definition")
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<FormDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Form>>)> {
    let Json(draft) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(form))))
}

/// Get form by ID
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    params(("id" = u64, Path, description = "Form id")),
    responses(
        (status = 200, body = Form),
        (status = 404, description = "Form not found")
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Form>>> {
    let form = state.store.get(parse_form_id(&id)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

/// Update a form; omitted members keep their value
#[utoipa::path(
    put,
    path = "/api/forms/{id}",
    params(("id" = u64, Path, description = "Form id")),
    request_body = FormPatch,
    responses(
        (status = 200, body = Form),
        (status = 400, description = "Invalid patch"),
        (status = 404, description = "Form not found")
    ),
    tag = "forms"
)]
pub async fn update_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<FormPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Form>>> {
    let id = parse_form_id(&id)?;
    let Json(patch) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = state.store.update(id, patch).await?;
    Ok(Json(ApiResponse::success(form)))
}

/// Delete a form
#[utoipa::path(
    delete,
    path = "/api/forms/{id}",
    params(("id" = u64, Path, description = "Form id")),
    responses(
        (status = 200, description = "Form deleted"),
        (status = 404, description = "Form not found")
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.store.delete(parse_form_id(&id)?).await?;
    Ok(Json(ApiResponse::message("Form deleted successfully")))
}
