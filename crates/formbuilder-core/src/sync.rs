//! External Sync Adapter
//!
//! Prompt.io custom-data client. The whole form collection lives in one
//! document (`formbuilder_forms`), read and replaced wholesale.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::credentials::VendorCredentials;
use crate::domain::aggregates::{Form, FormDraft, FormId, FormPatch};
use crate::store::{FormRepository, StoreBackend};
use crate::{FormsError, Result};

const FORMS_DOCUMENT_PATH: &str = "/api/custom-data/formbuilder_forms";

/// Prompt.io API client
pub struct PromptIoClient {
    /// Vendor origin, `https://{subdomain}.{domain}` unless overridden
    base_url: String,
    token: String,
    client: Client,
}

impl PromptIoClient {
    pub fn new(credentials: &VendorCredentials, domain: &str, timeout: Duration) -> Result<Self> {
        let base_url = format!("https://{}.{}", credentials.subdomain, domain);
        Self::with_base_url(&base_url, &credentials.token, timeout)
    }

    /// Client against an explicit origin (self-hosted gateways, tests).
    pub fn with_base_url(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read the remote collection. A missing document is an empty one.
    pub async fn list_remote(&self) -> Result<Vec<Form>> {
        let url = format!("{}{}", self.base_url, FORMS_DOCUMENT_PATH);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let body = ensure_success(response).await?.text().await.map_err(transport)?;
        parse_collection(&body)
    }

    /// Replace the remote collection.
    pub async fn save_remote(&self, forms: &[Form]) -> Result<()> {
        let url = format!("{}{}", self.base_url, FORMS_DOCUMENT_PATH);
        debug!("PUT {} ({} forms)", url, forms.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "forms": forms }))
            .send()
            .await
            .map_err(transport)?;

        ensure_success(response).await?;
        info!(forms = forms.len(), "remote form collection saved");
        Ok(())
    }

    /// Push an arbitrary payload into a Prompt.io data schema.
    pub async fn save_schema(&self, schema_id: u32, payload: &Value) -> Result<Value> {
        let url = format!("{}/rest/1.0/data/schema/{}", self.base_url, schema_id);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("accept", "*/*")
            .header("orgAuthToken", &self.token)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        let body = ensure_success(response).await?.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| FormsError::sync(None, format!("invalid schema response: {e}")))
    }
}

fn transport(e: reqwest::Error) -> FormsError {
    FormsError::sync(None, e.to_string())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "Prompt.io request failed");
    Err(FormsError::sync(Some(status.as_u16()), format!("{}: {}", status, text)))
}

/// `{forms: [...]}`, a bare array, or nothing at all.
fn parse_collection(body: &str) -> Result<Vec<Form>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FormsError::sync(None, format!("invalid forms document: {e}")))?;

    let forms = match value {
        Value::Array(_) => value,
        Value::Object(mut doc) => match doc.remove("forms") {
            Some(forms @ Value::Array(_)) => forms,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    serde_json::from_value(forms).map_err(|e| FormsError::sync(None, format!("invalid form in remote document: {e}")))
}

/// Form store backed by the Prompt.io document.
///
/// Each mutation reads the collection, edits it and writes it back under one
/// async lock. The lock also guards an id high-water mark so ids are not
/// reused within this process even if the remote copy loses entries.
pub struct RemoteFormStore {
    client: PromptIoClient,
    last_id: Mutex<FormId>,
}

impl RemoteFormStore {
    pub fn new(client: PromptIoClient) -> Self {
        Self {
            client,
            last_id: Mutex::new(0),
        }
    }

    pub fn client(&self) -> &PromptIoClient {
        &self.client
    }
}

#[async_trait]
impl FormRepository for RemoteFormStore {
    async fn list(&self) -> Result<Vec<Form>> {
        self.client.list_remote().await
    }

    async fn get(&self, id: FormId) -> Result<Form> {
        self.client
            .list_remote()
            .await?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or(FormsError::NotFound(id))
    }

    async fn create(&self, draft: FormDraft) -> Result<Form> {
        let draft = draft.validate()?;
        let mut last_id = self.last_id.lock().await;

        let mut forms = self.client.list_remote().await?;
        let id = forms.iter().map(|f| f.id).max().unwrap_or(0).max(*last_id) + 1;
        let form = Form::from_draft(id, draft, Utc::now());
        forms.push(form.clone());

        self.client.save_remote(&forms).await?;
        *last_id = id;

        info!(form_id = id, title = %form.title, "form created remotely");
        Ok(form)
    }

    async fn update(&self, id: FormId, patch: FormPatch) -> Result<Form> {
        let patch = patch.validate()?;
        let _guard = self.last_id.lock().await;

        let mut forms = self.client.list_remote().await?;
        let form = forms.iter_mut().find(|f| f.id == id).ok_or(FormsError::NotFound(id))?;
        form.apply(patch, Utc::now());
        let updated = form.clone();

        self.client.save_remote(&forms).await?;
        info!(form_id = id, "form updated remotely");
        Ok(updated)
    }

    async fn delete(&self, id: FormId) -> Result<()> {
        let _guard = self.last_id.lock().await;

        let mut forms = self.client.list_remote().await?;
        let index = forms.iter().position(|f| f.id == id).ok_or(FormsError::NotFound(id))?;
        forms.remove(index);

        self.client.save_remote(&forms).await?;
        info!(form_id = id, "form deleted remotely");
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Vendor
    }
}
