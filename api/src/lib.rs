//! Form Builder HTTP API
//!
//! JSON CRUD over the form store, server-rendered embed and preview pages,
//! submission forwarding and the Prompt.io proxy endpoints.
//!
//! ```text
//!  /api/forms ...........  FormRepository (in-memory or Prompt.io)
//!  /embed/:id, /preview ..  FormRenderer ──► SubmissionForwarder
//!  /api/save-to-schema ...  PromptIoClient
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;


use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use formbuilder_core::{
    Field, Form, FormDraft, FormPatch, FormRenderer, FormRepository, FormsError, InMemoryFormStore,
    RemoteFormStore, SubmissionForwarder,
};

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use models::*;

/// API state
pub struct ApiState {
    pub store: Arc<dyn FormRepository>,
    pub renderer: FormRenderer,
    pub forwarder: SubmissionForwarder,
    pub config: ServerConfig,
}

impl ApiState {
    pub fn new(config: ServerConfig, store: Arc<dyn FormRepository>) -> Result<Self, FormsError> {
        Ok(Self {
            store,
            renderer: FormRenderer::new()?,
            forwarder: SubmissionForwarder::new(config.http_timeout())?,
            config,
        })
    }

    /// State with the store picked from the configured credentials.
    pub fn from_config(config: ServerConfig) -> Result<Self, FormsError> {
        let store = select_store(&config)?;
        Self::new(config, store)
    }
}

/// Prompt.io-backed store when credentials resolve, otherwise in-memory.
pub fn select_store(config: &ServerConfig) -> Result<Arc<dyn FormRepository>, FormsError> {
    let host = config.public_host();
    match config.vendor_credentials(host.as_deref()) {
        Ok(credentials) => {
            tracing::info!(subdomain = %credentials.masked_subdomain(), "using Prompt.io form store");
            let client = config.prompt_io_client(&credentials)?;
            Ok(Arc::new(RemoteFormStore::new(client)))
        }
        Err(reason) => {
            tracing::info!(%reason, "using in-memory form store");
            let store = if config.seed_samples {
                InMemoryFormStore::with_sample_forms()
            } else {
                InMemoryFormStore::new()
            };
            Ok(Arc::new(store))
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Form Builder API",
        description = "Build, embed and collect forms",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::list_forms,
        routes::forms::create_form,
        routes::forms::get_form,
        routes::forms::update_form,
        routes::forms::delete_form,
        routes::embed::embed_form,
        routes::embed::embed_code,
        routes::submissions::submit_form,
        routes::vendor::test_env,
        routes::vendor::save_to_schema,
    ),
    components(
        schemas(
            Form, FormDraft, FormPatch, Field,
            EmbedCode, SubmissionRequest, SubmissionResult,
            EnvironmentReport, EnvironmentResponse,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Form management"),
        (name = "embed", description = "Embedding forms on other sites"),
        (name = "submissions", description = "Submission forwarding"),
        (name = "vendor", description = "Prompt.io integration")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api/forms", routes::forms::router())
        .route("/api/embed-form", get(routes::embed::embed_form))
        .route("/api/test-env", get(routes::vendor::test_env))
        .route("/api/save-to-schema", axum::routing::post(routes::vendor::save_to_schema))
        .route(
            "/embed/:id",
            get(routes::embed::embed_page).post(routes::embed::submit_embed),
        )
        .route("/preview/:id", get(routes::embed::preview_page))
        .layer(axum::middleware::from_fn(middleware::cors::preflight))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::cors_layer())
        .with_state(Arc::new(state))
}
