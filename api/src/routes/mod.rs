//! API Routes

pub mod embed;
pub mod forms;
pub mod health;
pub mod submissions;
pub mod vendor;

use axum::http::header::{HOST, REFERER, USER_AGENT};
use axum::http::HeaderMap;

use formbuilder_core::{ClientContext, FieldValues, FormId};

use crate::error::{ApiError, ApiResult};

/// Parse a form id taken from a path or query string.
pub(crate) fn parse_form_id(raw: &str) -> ApiResult<FormId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid form id: {raw}")))
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: axum::http::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub(crate) fn client_context(headers: &HeaderMap) -> ClientContext {
    ClientContext {
        user_agent: header_str(headers, USER_AGENT).map(str::to_string),
        referer: header_str(headers, REFERER).map(str::to_string),
    }
}

pub(crate) fn request_host(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, HOST)
}

/// Urlencoded fields as submission values.
pub(crate) fn field_values(fields: Vec<(String, String)>) -> FieldValues {
    fields
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect()
}
