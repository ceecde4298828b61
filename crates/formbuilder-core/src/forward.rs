//! Submission Forwarder
//!
//! Delivers collected field values to the form's callback URL. Nothing is
//! stored: without a destination the submission is logged and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::aggregates::{Form, FormId};
use crate::domain::value_objects::FieldValues;
use crate::{FormsError, Result};

/// Envelope POSTed to the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: FormId,
    pub form_title: String,
    pub data: FieldValues,
    pub submitted_at: DateTime<Utc>,
    pub client_context: ClientContext,
}

/// What is known about the submitting browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    Delivered { url: String, status: u16 },
    /// No destination configured
    Skipped,
}

impl ForwardOutcome {
    pub fn forwarded(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Delivered { url, .. } => Some(url),
            Self::Skipped => None,
        }
    }
}

/// Submission forwarder
pub struct SubmissionForwarder {
    client: reqwest::Client,
}

impl SubmissionForwarder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// A non-blank override beats the form's stored callback URL.
    pub fn resolve_destination(form: &Form, override_url: Option<&str>) -> Option<String> {
        override_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .or_else(|| form.callback_url.clone())
    }

    pub fn envelope(form: &Form, data: FieldValues, client_context: ClientContext) -> Submission {
        Submission {
            form_id: form.id,
            form_title: form.title.clone(),
            data,
            submitted_at: Utc::now(),
            client_context,
        }
    }

    /// POST the envelope if a destination exists. `required` is enforced by
    /// the rendered page, not here.
    pub async fn submit(
        &self,
        form: &Form,
        data: FieldValues,
        destination: Option<&str>,
        client_context: ClientContext,
    ) -> Result<ForwardOutcome> {
        let submission = Self::envelope(form, data, client_context);
        let Some(url) = Self::resolve_destination(form, destination) else {
            tracing::info!(
                form_id = form.id,
                fields = submission.data.len(),
                "submission accepted without a callback URL"
            );
            return Ok(ForwardOutcome::Skipped);
        };
        check_destination(&url)?;

        let response = self
            .client
            .post(&url)
            .json(&submission)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(form_id = form.id, %url, error = %e, "submission forwarding failed");
                FormsError::ForwardingFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(form_id = form.id, %url, status = status.as_u16(), "callback rejected submission");
            return Err(FormsError::ForwardingFailed(format!("callback responded with HTTP {status}")));
        }

        tracing::info!(form_id = form.id, %url, status = status.as_u16(), "submission forwarded");
        Ok(ForwardOutcome::Delivered {
            url,
            status: status.as_u16(),
        })
    }
}

fn check_destination(url: &str) -> Result<()> {
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(FormsError::Validation(format!("invalid callback URL: {url}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::sample_forms;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forwarder() -> SubmissionForwarder {
        SubmissionForwarder::new(Duration::from_secs(5)).unwrap()
    }

    fn contact_values() -> FieldValues {
        FieldValues::from([
            ("name".to_string(), json!("A")),
            ("email".to_string(), json!("a@b.com")),
            ("message".to_string(), json!("hi")),
        ])
    }

    #[tokio::test]
    async fn test_contact_form_posts_once_to_callback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(json!({
                "formId": 1,
                "formTitle": "Contact Form",
                "data": { "email": "a@b.com" }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = sample_forms(Utc::now()).remove(0);
        form.callback_url = Some(format!("{}/hook", server.uri()));

        let outcome = forwarder()
            .submit(&form, contact_values(), None, ClientContext::default())
            .await
            .unwrap();

        assert!(outcome.forwarded());
        assert_eq!(outcome.destination(), form.callback_url.as_deref());
    }

    #[tokio::test]
    async fn test_override_beats_stored_callback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/override"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = sample_forms(Utc::now()).remove(0);
        form.callback_url = Some(format!("{}/stored", server.uri()));
        let override_url = format!("{}/override", server.uri());

        let outcome = forwarder()
            .submit(&form, contact_values(), Some(override_url.as_str()), ClientContext::default())
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::Delivered { url: override_url, status: 202 });
    }

    #[tokio::test]
    async fn test_no_destination_is_a_silent_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let form = sample_forms(Utc::now()).remove(0);
        let outcome = forwarder()
            .submit(&form, contact_values(), Some("  "), ClientContext::default())
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_error_status_is_forwarding_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let form = sample_forms(Utc::now()).remove(0);
        let err = forwarder()
            .submit(&form, contact_values(), Some(server.uri().as_str()), ClientContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "forwarding_failed");
    }

    #[tokio::test]
    async fn test_empty_values_without_destination_are_skipped() {
        let form = sample_forms(Utc::now()).remove(0);
        let outcome = forwarder()
            .submit(&form, FieldValues::new(), None, ClientContext::default())
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_blank_required_value_is_still_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "data": { "email": "   " } })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let form = sample_forms(Utc::now()).remove(0);
        let mut values = contact_values();
        values.insert("email".into(), json!("   "));

        let outcome = forwarder()
            .submit(&form, values, Some(server.uri().as_str()), ClientContext::default())
            .await
            .unwrap();
        assert!(outcome.forwarded());
    }

    #[tokio::test]
    async fn test_slow_callback_times_out_as_forwarding_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let form = sample_forms(Utc::now()).remove(0);
        let err = SubmissionForwarder::new(Duration::from_millis(200))
            .unwrap()
            .submit(&form, contact_values(), Some(server.uri().as_str()), ClientContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::ForwardingFailed(_)));
    }

    #[tokio::test]
    async fn test_non_http_destination_is_rejected() {
        let form = sample_forms(Utc::now()).remove(0);
        let err = forwarder()
            .submit(&form, contact_values(), Some("file:///etc/passwd"), ClientContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_envelope_carries_client_context() {
        let form = sample_forms(Utc::now()).remove(1);
        let context = ClientContext {
            user_agent: Some("Mozilla/5.0".into()),
            referer: None,
        };
        let envelope = SubmissionForwarder::envelope(&form, FieldValues::new(), context);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["formId"], 2);
        assert_eq!(value["formTitle"], "Survey Form");
        assert_eq!(value["clientContext"]["userAgent"], "Mozilla/5.0");
        assert!(value["clientContext"].get("referer").is_none());
        assert!(value.get("submittedAt").is_some());
    }
}
