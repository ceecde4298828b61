//! Embedding: form lookup for third-party pages, iframe snippets and the
//! server-rendered embed and preview documents.

use axum::extract::{Form as FormBody, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use formbuilder_core::render::{embed_path, embed_snippet};
use formbuilder_core::{Form, FormId, FormsError, Notice, RenderOptions};

use crate::error::{status_for, ApiError, ApiResult};
use crate::models::{ApiResponse, CallbackQuery, EmbedCode, EmbedFormQuery};
use crate::routes::{client_context, field_values, parse_form_id};
use crate::ApiState;

const SUBMIT_SUCCESS: &str = "Thank you! Your form has been submitted successfully.";
const SUBMIT_FAILURE: &str = "Sorry, there was an error submitting your form. Please try again.";

/// Fetch a single form for embedding
#[utoipa::path(
    get,
    path = "/api/embed-form",
    params(EmbedFormQuery),
    responses(
        (status = 200, body = Form),
        (status = 400, description = "Missing or invalid form id"),
        (status = 404, description = "Form not found")
    ),
    tag = "embed"
)]
pub async fn embed_form(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EmbedFormQuery>,
) -> ApiResult<Json<ApiResponse<Form>>> {
    let raw = query
        .form_id
        .or(query.id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Form ID is required".into()))?;

    let form = state.store.get(parse_form_id(&raw)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

/// Iframe snippet for a form
#[utoipa::path(
    get,
    path = "/api/forms/{id}/embed-code",
    params(("id" = u64, Path, description = "Form id"), CallbackQuery),
    responses(
        (status = 200, body = EmbedCode),
        (status = 404, description = "Form not found")
    ),
    tag = "embed"
)]
pub async fn embed_code(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<ApiResponse<EmbedCode>>> {
    let form = state.store.get(parse_form_id(&id)?).await?;
    let base = state.config.public_url.trim_end_matches('/');
    let callback = query.callback_url.as_deref();

    Ok(Json(ApiResponse::success(EmbedCode {
        form_id: form.id,
        embed_url: format!("{}{}", base, embed_path(form.id, callback)),
        embed_code: embed_snippet(base, form.id, callback),
    })))
}

/// Live embed page
pub async fn embed_page(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let form = match load_form(&state, &id).await {
        Ok(form) => form,
        Err(page) => return page,
    };
    let options = RenderOptions::embed(embed_path(form.id, query.callback_url.as_deref()));
    render_page(&state, &form, &options, StatusCode::OK)
}

/// Form post from an embed page; the page comes back with a notice.
pub async fn submit_embed(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
    FormBody(fields): FormBody<Vec<(String, String)>>,
) -> Response {
    let form = match load_form(&state, &id).await {
        Ok(form) => form,
        Err(page) => return page,
    };
    let callback = query.callback_url.as_deref();

    let result = state
        .forwarder
        .submit(&form, field_values(fields), callback, client_context(&headers))
        .await;

    let (status, notice) = match result {
        Ok(_) => (StatusCode::OK, Notice::success(SUBMIT_SUCCESS)),
        Err(FormsError::Validation(message)) => (StatusCode::BAD_REQUEST, Notice::error(message)),
        Err(err) => {
            tracing::warn!(form_id = form.id, error = %err, "embed submission failed");
            (status_for(&err), Notice::error(SUBMIT_FAILURE))
        }
    };

    let options = RenderOptions::embed(embed_path(form.id, callback)).with_notice(notice);
    render_page(&state, &form, &options, status)
}

/// Inert preview document
pub async fn preview_page(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Response {
    match load_form(&state, &id).await {
        Ok(form) => render_page(&state, &form, &RenderOptions::preview(), StatusCode::OK),
        Err(page) => page,
    }
}

async fn load_form(state: &ApiState, raw_id: &str) -> Result<Form, Response> {
    let result = match raw_id.trim().parse::<FormId>() {
        Ok(id) => state.store.get(id).await,
        Err(_) => Err(FormsError::Validation(format!("Invalid form id: {raw_id}"))),
    };
    result.map_err(|err| {
        let (status, text) = match &err {
            FormsError::NotFound(_) | FormsError::Validation(_) => (StatusCode::NOT_FOUND, "Form not found"),
            _ => (status_for(&err), "Failed to load form"),
        };
        message_page(state, status, text)
    })
}

fn render_page(state: &ApiState, form: &Form, options: &RenderOptions, status: StatusCode) -> Response {
    match state.renderer.render_form(form, options) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!(form_id = form.id, error = %err, "form rendering failed");
            message_page(state, StatusCode::INTERNAL_SERVER_ERROR, "Failed to render form")
        }
    }
}

fn message_page(state: &ApiState, status: StatusCode, text: &str) -> Response {
    match state.renderer.render_message(text, text) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, text.to_string()).into_response(),
    }
}
