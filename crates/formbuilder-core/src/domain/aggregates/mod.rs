//! Form Aggregate
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::value_objects::{Field, FieldType};
use crate::{FormsError, Result};

pub type FormId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Form {
    /// Build a stored form from an already validated draft.
    pub fn from_draft(id: FormId, draft: FormDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            fields: draft.fields,
            callback_url: draft.callback_url,
            created_at,
            updated_at: None,
        }
    }

    /// Merge a validated patch. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: FormPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(fields) = patch.fields {
            self.fields = fields;
        }
        if let Some(callback_url) = patch.callback_url {
            self.callback_url = non_empty(callback_url);
        }
        self.updated_at = Some(now);
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// Client-supplied form definition; the store assigns `id` and `createdAt`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl FormDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Trim text, drop an empty callback URL and check the draft invariants.
    pub fn validate(self) -> Result<Self> {
        let title = validate_title(&self.title)?;
        validate_fields(&self.fields)?;
        let callback_url = validate_callback(self.callback_url)?;
        Ok(Self {
            title,
            description: self.description.trim().to_string(),
            fields: self.fields,
            callback_url,
        })
    }
}

/// Partial update. Omitted members keep their stored value; an empty
/// `callbackUrl` clears it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl FormPatch {
    pub fn validate(self) -> Result<Self> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        if let Some(fields) = &self.fields {
            validate_fields(fields)?;
        }
        // Keep an explicit empty string so `apply` can clear the stored URL.
        let callback_url = match self.callback_url {
            Some(url) => Some(validate_callback(Some(url))?.unwrap_or_default()),
            None => None,
        };
        Ok(Self {
            title,
            description: self.description.map(|d| d.trim().to_string()),
            fields: self.fields,
            callback_url,
        })
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(FormsError::Validation("form title is required".into()));
    }
    Ok(title.to_string())
}

fn validate_fields(fields: &[Field]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.id.trim().is_empty() {
            return Err(FormsError::Validation("field id must not be empty".into()));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(FormsError::Validation(format!("duplicate field id: {}", field.id)));
        }
    }
    Ok(())
}

fn validate_callback(callback_url: Option<String>) -> Result<Option<String>> {
    let Some(raw) = callback_url.and_then(non_empty) else {
        return Ok(None);
    };
    let parsed = url::Url::parse(&raw)
        .map_err(|e| FormsError::Validation(format!("invalid callback URL {raw:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(Some(raw)),
        other => Err(FormsError::Validation(format!(
            "callback URL must use http or https, got {other}"
        ))),
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The two demo forms every fresh local store starts with.
pub fn sample_forms(created_at: DateTime<Utc>) -> Vec<Form> {
    vec![
        Form {
            id: 1,
            title: "Contact Form".into(),
            description: "A simple contact form".into(),
            fields: vec![
                Field::new("name", FieldType::Text, "Name").required(),
                Field::new("email", FieldType::Email, "Email").required(),
                Field::new("message", FieldType::Textarea, "Message").required(),
            ],
            callback_url: None,
            created_at,
            updated_at: None,
        },
        Form {
            id: 2,
            title: "Survey Form".into(),
            description: "Customer satisfaction survey".into(),
            fields: vec![
                Field::new("rating", FieldType::Radio, "Rating")
                    .with_options(["1", "2", "3", "4", "5"])
                    .required(),
                Field::new("feedback", FieldType::Textarea, "Additional Feedback"),
            ],
            callback_url: None,
            created_at,
            updated_at: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_requires_title() {
        let err = FormDraft::new("   ").validate().unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_draft_rejects_duplicate_field_ids() {
        let mut draft = FormDraft::new("Signup");
        draft.fields = vec![
            Field::new("email", FieldType::Email, "Email"),
            Field::new("email", FieldType::Text, "Email again"),
        ];
        assert!(matches!(draft.validate(), Err(FormsError::Validation(_))));
    }

    #[test]
    fn test_draft_callback_url_rules() {
        let mut draft = FormDraft::new("Hooked");
        draft.callback_url = Some("  ".into());
        assert_eq!(draft.clone().validate().unwrap().callback_url, None);

        draft.callback_url = Some("ftp://example.com/drop".into());
        assert!(draft.clone().validate().is_err());

        draft.callback_url = Some("not a url".into());
        assert!(draft.clone().validate().is_err());

        draft.callback_url = Some("https://example.com/hook".into());
        assert_eq!(
            draft.validate().unwrap().callback_url.as_deref(),
            Some("https://example.com/hook")
        );
    }

    #[test]
    fn test_apply_preserves_omitted_members() {
        let created = Utc::now();
        let mut form = sample_forms(created).remove(0);
        form.callback_url = Some("https://example.com/hook".into());

        let patch = FormPatch {
            title: Some("Contact Us".into()),
            ..Default::default()
        };
        form.apply(patch.validate().unwrap(), Utc::now());

        assert_eq!(form.id, 1);
        assert_eq!(form.title, "Contact Us");
        assert_eq!(form.fields.len(), 3);
        assert_eq!(form.callback_url.as_deref(), Some("https://example.com/hook"));
        assert_eq!(form.created_at, created);
        assert!(form.updated_at.is_some());
    }

    #[test]
    fn test_apply_empty_callback_clears_it() {
        let mut form = sample_forms(Utc::now()).remove(0);
        form.callback_url = Some("https://example.com/hook".into());
        let patch = FormPatch {
            callback_url: Some(String::new()),
            ..Default::default()
        };
        form.apply(patch.validate().unwrap(), Utc::now());
        assert_eq!(form.callback_url, None);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let form = sample_forms(Utc::now()).remove(1);
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("callbackUrl").is_none());
        assert!(value.get("updatedAt").is_none());
        assert_eq!(value["fields"][0]["options"], json!(["1", "2", "3", "4", "5"]));
    }
}
