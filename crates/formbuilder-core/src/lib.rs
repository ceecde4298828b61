//! Form Builder Core
//!
//! Form definitions and everything the service does with them.
//!
//! ## Features
//! - Form store with monotonic integer ids (in-memory or Prompt.io backed)
//! - Preview and embed rendering of forms as standalone HTML
//! - Submission forwarding to per-form callback URLs
//! - Whole-collection sync with a Prompt.io custom-data document
//!
//! ```text
//!  client ──► FormRepository ──► FormRenderer (preview / embed)
//!                 │
//!                 ├── InMemoryFormStore   (default)
//!                 └── RemoteFormStore ──► PromptIoClient (vendor credentials present)
//!
//!  embed submit ──► SubmissionForwarder ──► callback URL
//! ```

pub mod credentials;
pub mod domain;
pub mod forward;
pub mod render;
pub mod store;
pub mod sync;

use thiserror::Error;

pub use credentials::{CredentialStore, MemoryCredentialStore, VendorCredentials};
pub use domain::aggregates::{Form, FormDraft, FormId, FormPatch};
pub use domain::value_objects::{Field, FieldType, FieldValues};
pub use forward::{ClientContext, ForwardOutcome, Submission, SubmissionForwarder};
pub use render::{FormRenderer, Notice, RenderMode, RenderOptions};
pub use store::{FormRepository, InMemoryFormStore, StoreBackend};
pub use sync::{PromptIoClient, RemoteFormStore};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Form not found: {0}")]
    NotFound(FormId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forwarding failed: {0}")]
    ForwardingFailed(String),

    #[error("Vendor sync failed: {message}")]
    SyncFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Vendor credentials missing: {0}")]
    ConfigMissing(String),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl FormsError {
    /// Stable machine-readable kind, independent of the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::ForwardingFailed(_) => "forwarding_failed",
            Self::SyncFailed { .. } => "sync_failed",
            Self::ConfigMissing(_) => "config_missing",
            Self::Template(_) | Self::Render(_) => "render_error",
            Self::HttpClient(_) => "http_client_error",
        }
    }

    pub(crate) fn sync(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SyncFailed {
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(FormsError::NotFound(7).kind(), "not_found");
        assert_eq!(FormsError::Validation("x".into()).kind(), "validation_error");
        assert_eq!(FormsError::sync(Some(500), "boom").kind(), "sync_failed");
        assert_eq!(FormsError::ConfigMissing("x".into()).kind(), "config_missing");
    }

    #[test]
    fn test_not_found_message_names_the_id() {
        assert_eq!(FormsError::NotFound(42).to_string(), "Form not found: 42");
    }
}
