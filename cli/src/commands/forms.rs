//! Form commands

use anyhow::{bail, Context};
use std::path::Path;

use formbuilder_core::{Form, FormDraft, FormPatch};

use super::ApiClient;
use crate::output::{self, OutputFormat};
use crate::FormCommands;

#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedCode {
    form_id: u64,
    embed_url: String,
    embed_code: String,
}

pub async fn handle(action: FormCommands, client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        FormCommands::List => {
            let forms: Vec<Form> = client.get("/api/forms").await?;
            format.print_forms(&forms)?;
        }
        FormCommands::Get { id } => {
            let form: Form = client.get(&format!("/api/forms/{}", id)).await?;
            format.print_form(&form)?;
        }
        FormCommands::Create { file, title, description, callback_url } => {
            let draft = match (file, title) {
                (Some(path), _) => read_draft(&path)?,
                (None, Some(title)) => FormDraft {
                    description: description.unwrap_or_default(),
                    callback_url,
                    ..FormDraft::new(title)
                },
                (None, None) => bail!("either --file or --title is required"),
            };
            let form: Form = client.post("/api/forms", &draft).await?;
            output::success(&format!("Created form {} ({})", form.id, form.title));
        }
        FormCommands::Update { id, title, description, callback_url } => {
            let patch = FormPatch {
                title,
                description,
                callback_url,
                ..FormPatch::default()
            };
            let form: Form = client.put(&format!("/api/forms/{}", id), &patch).await?;
            format.print_form(&form)?;
        }
        FormCommands::Delete { id } => {
            let message = client.delete(&format!("/api/forms/{}", id)).await?;
            output::success(&message);
        }
        FormCommands::EmbedCode { id, callback_url } => {
            let mut path = format!("/api/forms/{}/embed-code", id);
            if let Some(url) = callback_url {
                let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("callbackUrl", &url)
                    .finish();
                path = format!("{}?{}", path, encoded);
            }
            let code: EmbedCode = client.get(&path).await?;
            match format {
                OutputFormat::Table => println!("{}", code.embed_code),
                _ => format.print(&code)?,
            }
        }
    }
    Ok(())
}

/// Form draft from a JSON or YAML file.
fn read_draft(path: &Path) -> anyhow::Result<FormDraft> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let draft = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(draft)
}
