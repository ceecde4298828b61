//! API Models

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use formbuilder_core::{FieldValues, FormId, StoreBackend};

/// Standard API response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data: Some(data), message: Some(message.into()) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}

/// `?formId=` (or the older `?id=`) for the embed lookup
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmbedFormQuery {
    pub form_id: Option<String>,
    pub id: Option<String>,
}

/// Callback URL override carried on embed URLs
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub callback_url: Option<String>,
}

/// Embed code for a form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbedCode {
    pub form_id: FormId,
    pub embed_url: String,
    pub embed_code: String,
}

/// Submission posted through the JSON API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[schema(value_type = Object)]
    pub data: FieldValues,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Submission result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub forwarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Vendor configuration report; secrets are never echoed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    pub has_subdomain: bool,
    pub has_api_key: bool,
    pub subdomain: String,
    pub api_key_length: usize,
    #[schema(value_type = String)]
    pub backend: StoreBackend,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnvironmentResponse {
    pub success: bool,
    pub environment: EnvironmentReport,
}
