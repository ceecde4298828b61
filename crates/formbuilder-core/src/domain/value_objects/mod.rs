//! Forms value objects
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Submitted values keyed by field id.
pub type FieldValues = BTreeMap<String, serde_json::Value>;

/// Placeholder choices for a radio field without options.
pub const RADIO_FALLBACK_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Field {
    pub id: String,
    #[serde(rename = "type", default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "text"))]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Options as rendered: radio fields fall back to two placeholders.
    pub fn effective_options(&self) -> Vec<String> {
        if self.options.is_empty() && self.field_type == FieldType::Radio {
            RADIO_FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect()
        } else {
            self.options.clone()
        }
    }
}

/// Field kind. Anything outside the known set is kept verbatim in `Other`
/// and rendered as a plain `<input>` of that type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" | "text" => Self::Text,
            "email" => Self::Email,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for FieldType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
