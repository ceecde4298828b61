//! Form Renderer
//!
//! Turns form definitions into standalone HTML documents. Preview and embed
//! pages share the per-field templates and differ only in the document
//! wrapper: the embed page carries native `required` constraints and posts
//! back to the server, the preview is inert.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::domain::aggregates::{Form, FormId};
use crate::domain::value_objects::{Field, FieldType};
use crate::Result;

/// Rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Inert markup for the builder's preview window
    Preview,
    /// Live page hosted inside a third-party iframe
    Embed,
}

/// Banner shown above the embed form after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

/// Document-level options for [`FormRenderer::render_form`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: RenderMode,
    /// Submission target for embed pages
    /// Rendered unescaped; build it with [`embed_path`].
    pub action: Option<String>,
    pub notice: Option<Notice>,
}

impl RenderOptions {
    pub fn preview() -> Self {
        Self { mode: RenderMode::Preview, action: None, notice: None }
    }

    pub fn embed(action: impl Into<String>) -> Self {
        Self { mode: RenderMode::Embed, action: Some(action.into()), notice: None }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Form renderer
pub struct FormRenderer {
    handlebars: Handlebars<'static>,
}

impl FormRenderer {
    pub fn new() -> Result<Self> {
        let mut hb = Handlebars::new();

        hb.register_partial("label_text", LABEL_TEXT)?;
        hb.register_template_string("field_input", FIELD_INPUT)?;
        hb.register_template_string("field_textarea", FIELD_TEXTAREA)?;
        hb.register_template_string("field_select", FIELD_SELECT)?;
        hb.register_template_string("field_radio", FIELD_RADIO)?;
        hb.register_template_string("field_checkbox", FIELD_CHECKBOX)?;
        hb.register_template_string("document", DOCUMENT)?;
        hb.register_template_string("message_page", MESSAGE_PAGE)?;

        Ok(Self { handlebars: hb })
    }

    /// Markup for a single field.
    pub fn render_field(&self, field: &Field, mode: RenderMode) -> Result<String> {
        let data = json!({
            "id": field.id,
            "dom_id": format!("field_{}", field.id),
            "label": field.label,
            "input_type": field.field_type.as_str(),
            "star": field.required,
            "required": field.required && mode == RenderMode::Embed,
            "options": field.effective_options(),
        });
        Ok(self.handlebars.render(template_for(&field.field_type), &data)?)
    }

    /// Full HTML document for a form.
    pub fn render_form(&self, form: &Form, options: &RenderOptions) -> Result<String> {
        let fields = form
            .fields
            .iter()
            .map(|field| self.render_field(field, options.mode))
            .collect::<Result<Vec<_>>>()?
            .join("\n");

        let page_title = match options.mode {
            RenderMode::Preview => format!("Preview: {}", form.title),
            RenderMode::Embed => form.title.clone(),
        };

        let data = json!({
            "page_title": page_title,
            "mode": options.mode,
            "styles": STYLES,
            "title": form.title,
            "description": form.description,
            "notice": options.notice,
            "action": options.action,
            "fields": fields,
        });
        Ok(self.handlebars.render("document", &data)?)
    }

    /// Minimal page for embed errors such as an unknown form id.
    pub fn render_message(&self, title: &str, text: &str) -> Result<String> {
        let data = json!({ "title": title, "text": text, "styles": STYLES });
        Ok(self.handlebars.render("message_page", &data)?)
    }
}

fn template_for(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Textarea => "field_textarea",
        FieldType::Select => "field_select",
        FieldType::Radio => "field_radio",
        FieldType::Checkbox => "field_checkbox",
        FieldType::Text | FieldType::Email | FieldType::Other(_) => "field_input",
    }
}

/// Path of the embed page, carrying an optional callback override.
pub fn embed_path(form_id: FormId, callback_url: Option<&str>) -> String {
    match callback_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => {
            let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
            format!("/embed/{}?callbackUrl={}", form_id, encoded)
        }
        None => format!("/embed/{}", form_id),
    }
}

/// Iframe snippet a site owner pastes into their page.
pub fn embed_snippet(base_url: &str, form_id: FormId, callback_url: Option<&str>) -> String {
    let src = format!("{}{}", base_url.trim_end_matches('/'), embed_path(form_id, callback_url));
    format!(
        "<iframe\n    src=\"{}\"\n    width=\"100%\"\n    height=\"600\"\n    frameborder=\"0\"\n    style=\"border: none; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);\">\n</iframe>",
        src
    )
}

// =============================================================================
// Templates
// =============================================================================

const LABEL_TEXT: &str = r#"{{label}}{{#if star}} <span class="required">*</span>{{/if}}"#;

const FIELD_INPUT: &str = r#"<div class="form-field">
  <label for="{{dom_id}}">{{> label_text}}</label>
  <input type="{{input_type}}" id="{{dom_id}}" name="{{id}}" placeholder="{{label}}"{{#if required}} required{{/if}}>
</div>"#;

const FIELD_TEXTAREA: &str = r#"<div class="form-field">
  <label for="{{dom_id}}">{{> label_text}}</label>
  <textarea id="{{dom_id}}" name="{{id}}" placeholder="{{label}}"{{#if required}} required{{/if}}></textarea>
</div>"#;

const FIELD_SELECT: &str = r#"<div class="form-field">
  <label for="{{dom_id}}">{{> label_text}}</label>
  <select id="{{dom_id}}" name="{{id}}"{{#if required}} required{{/if}}>
    <option value="">Select an option</option>
{{#each options}}
    <option value="{{this}}">{{this}}</option>
{{/each}}
  </select>
</div>"#;

const FIELD_RADIO: &str = r#"<fieldset class="form-field">
  <legend>{{> label_text}}</legend>
{{#each options}}
  <div class="choice">
    <input type="radio" id="{{../dom_id}}_{{@index}}" name="{{../id}}" value="{{this}}"{{#if ../required}} required{{/if}}>
    <label for="{{../dom_id}}_{{@index}}">{{this}}</label>
  </div>
{{/each}}
</fieldset>"#;

const FIELD_CHECKBOX: &str = r#"<div class="form-field form-field--checkbox">
  <input type="checkbox" id="{{dom_id}}" name="{{id}}" value="true"{{#if required}} required{{/if}}>
  <label for="{{dom_id}}">{{> label_text}}</label>
</div>"#;

const DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{page_title}}</title>
  <style>{{{styles}}}</style>
</head>
<body class="mode-{{mode}}">
  <main class="form-card">
    <h2>{{title}}</h2>
{{#if description}}
    <p class="description">{{description}}</p>
{{/if}}
{{#if notice}}
    <div class="notice notice--{{notice.kind}}" role="status">{{notice.text}}</div>
{{/if}}
{{#if action}}
    <form method="post" action="{{{action}}}">
{{else}}
    <form onsubmit="return false;">
{{/if}}
{{{fields}}}
      <button type="submit">Submit</button>
    </form>
  </main>
</body>
</html>
"#;

const MESSAGE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <style>{{{styles}}}</style>
</head>
<body>
  <main class="form-card">
    <div class="notice notice--error" role="alert">{{text}}</div>
  </main>
</body>
</html>
"#;

const STYLES: &str = "body{font-family:Arial,sans-serif;background:#f9fafb;margin:0;padding:32px 16px}\
.form-card{max-width:640px;margin:0 auto;background:#fff;border:1px solid #e5e7eb;border-radius:12px;padding:32px}\
.form-field{margin-bottom:16px;border:none;padding:0}\
label,legend{display:block;margin-bottom:6px;font-weight:bold;color:#374151}\
input,textarea,select{width:100%;padding:8px;border:1px solid #ccc;border-radius:4px;box-sizing:border-box}\
input[type=radio],input[type=checkbox]{width:auto;margin-right:8px}\
.choice,.form-field--checkbox{display:flex;align-items:center}\
.choice label,.form-field--checkbox label{display:inline;margin:0;font-weight:normal}\
.required{color:#ef4444}\
button{width:100%;padding:12px;background:#2563eb;color:#fff;border:none;border-radius:8px;cursor:pointer}\
.notice{margin:16px 0;padding:16px;border-radius:8px}\
.notice--success{background:#f0fdf4;color:#166534;border:1px solid #bbf7d0}\
.notice--error{background:#fef2f2;color:#991b1b;border:1px solid #fecaca}";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::sample_forms;
    use chrono::Utc;

    fn renderer() -> FormRenderer {
        FormRenderer::new().expect("templates compile")
    }

    #[test]
    fn test_radio_renders_one_choice_per_option_in_order() {
        let field = Field::new("choice", FieldType::Radio, "Pick").with_options(["A", "B", "C"]);
        let html = renderer().render_field(&field, RenderMode::Embed).unwrap();

        assert_eq!(html.matches(r#"type="radio""#).count(), 3);
        assert_eq!(html.matches(r#"name="choice""#).count(), 3);
        let a = html.find(r#"value="A""#).unwrap();
        let b = html.find(r#"value="B""#).unwrap();
        let c = html.find(r#"value="C""#).unwrap();
        assert!(a < b && b < c);
        assert!(html.contains(r#"id="field_choice_2""#));
    }

    #[test]
    fn test_radio_without_options_renders_placeholders() {
        let field = Field::new("choice", FieldType::Radio, "Pick");
        let html = renderer().render_field(&field, RenderMode::Preview).unwrap();
        assert_eq!(html.matches(r#"type="radio""#).count(), 2);
        assert!(html.contains(r#"value="Option 1""#));
        assert!(html.contains(r#"value="Option 2""#));
    }

    #[test]
    fn test_unknown_type_falls_back_to_verbatim_input() {
        let field = Field::new("volume", FieldType::from("slider"), "Volume");
        let html = renderer().render_field(&field, RenderMode::Embed).unwrap();
        assert!(html.contains(r#"<input type="slider""#));
        assert!(html.contains(r#"name="volume""#));
    }

    #[test]
    fn test_select_starts_with_neutral_choice() {
        let field = Field::new("size", FieldType::Select, "Size").with_options(["S", "M"]);
        let html = renderer().render_field(&field, RenderMode::Embed).unwrap();
        let neutral = html.find(r#"<option value="">Select an option</option>"#).unwrap();
        let small = html.find(r#"<option value="S">S</option>"#).unwrap();
        let medium = html.find(r#"<option value="M">M</option>"#).unwrap();
        assert!(neutral < small && small < medium);
    }

    #[test]
    fn test_textarea_and_checkbox_markup() {
        let r = renderer();
        let textarea = Field::new("message", FieldType::Textarea, "Message");
        let html = r.render_field(&textarea, RenderMode::Embed).unwrap();
        assert!(html.contains(r#"<textarea id="field_message" name="message" placeholder="Message""#));

        let checkbox = Field::new("agree", FieldType::Checkbox, "I agree");
        let html = r.render_field(&checkbox, RenderMode::Embed).unwrap();
        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains(r#"value="true""#));
        assert!(html.contains("I agree"));
    }

    #[test]
    fn test_required_marker_per_mode() {
        let r = renderer();
        let field = Field::new("email", FieldType::Email, "Email").required();

        let preview = r.render_field(&field, RenderMode::Preview).unwrap();
        assert!(preview.contains(r#"<span class="required">*</span>"#));
        assert!(!preview.contains(" required>"));

        let embed = r.render_field(&field, RenderMode::Embed).unwrap();
        assert!(embed.contains(r#"<span class="required">*</span>"#));
        assert!(embed.contains(r#"type="email""#));
        assert!(embed.contains(" required>"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let field = Field::new("x", FieldType::Text, "<script>alert(1)</script>");
        let html = renderer().render_field(&field, RenderMode::Preview).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_form_preview_and_embed_wrappers() {
        let r = renderer();
        let form = sample_forms(Utc::now()).remove(0);

        let preview = r.render_form(&form, &RenderOptions::preview()).unwrap();
        assert!(preview.contains("<title>Preview: Contact Form</title>"));
        assert!(preview.contains("A simple contact form"));
        assert!(preview.contains(r#"onsubmit="return false;""#));
        let name = preview.find(r#"name="name""#).unwrap();
        let email = preview.find(r#"name="email""#).unwrap();
        let message = preview.find(r#"name="message""#).unwrap();
        assert!(name < email && email < message);

        let embed = r
            .render_form(&form, &RenderOptions::embed("/embed/1").with_notice(Notice::success("Thanks")))
            .unwrap();
        assert!(embed.contains(r#"<form method="post" action="/embed/1">"#));
        assert!(embed.contains(r#"notice--success"#));
        assert!(embed.contains(r#"<button type="submit">Submit</button>"#));
    }

    #[test]
    fn test_render_form_omits_empty_description() {
        let mut form = sample_forms(Utc::now()).remove(0);
        form.description.clear();
        let html = renderer().render_form(&form, &RenderOptions::preview()).unwrap();
        assert!(!html.contains(r#"class="description""#));
    }

    #[test]
    fn test_embed_snippet_encodes_callback() {
        let snippet = embed_snippet("https://forms.example.com/", 7, Some("https://hooks.example.com/in?a=1"));
        assert!(snippet.starts_with("<iframe"));
        assert!(snippet.contains(
            r#"src="https://forms.example.com/embed/7?callbackUrl=https%3A%2F%2Fhooks.example.com%2Fin%3Fa%3D1""#
        ));
        assert!(snippet.contains(r#"height="600""#));

        let plain = embed_snippet("https://forms.example.com", 7, Some("  "));
        assert!(plain.contains(r#"src="https://forms.example.com/embed/7""#));
    }

    #[test]
    fn test_form_action_keeps_callback_query_readable() {
        let form = sample_forms(Utc::now()).remove(0);
        let action = embed_path(1, Some("https://hooks.example.com/in"));
        let html = renderer().render_form(&form, &RenderOptions::embed(action)).unwrap();
        assert!(html.contains(
            r#"action="/embed/1?callbackUrl=https%3A%2F%2Fhooks.example.com%2Fin""#
        ));
        assert!(!html.contains("&#x3D;"));
    }
}
