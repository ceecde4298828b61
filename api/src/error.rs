use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use formbuilder_core::FormsError;

use crate::models::ApiResponse;

/// Error type for JSON handlers.
///
/// Every failure leaves the server as `{success: false, message}` with a
/// status derived from the error kind.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Forms(#[from] FormsError),

    /// Malformed request that never reached the domain layer.
    #[error("{0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forms(err) => status_for(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// HTTP status for a domain error.
pub fn status_for(err: &FormsError) -> StatusCode {
    match err {
        FormsError::NotFound(_) => StatusCode::NOT_FOUND,
        FormsError::Validation(_) => StatusCode::BAD_REQUEST,
        FormsError::ForwardingFailed(_) | FormsError::SyncFailed { .. } => StatusCode::BAD_GATEWAY,
        FormsError::ConfigMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        FormsError::Template(_) | FormsError::Render(_) | FormsError::HttpClient(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Forms(err) if status.is_server_error() => {
                tracing::error!(kind = err.kind(), error = %err, "request failed");
                err.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::error(message))).into_response()
    }
}
