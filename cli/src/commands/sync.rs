//! Prompt.io sync commands

use anyhow::Context;
use std::time::Duration;

use formbuilder_core::credentials::DEFAULT_VENDOR_DOMAIN;
use formbuilder_core::{CredentialStore, Form, PromptIoClient, VendorCredentials};

use super::ApiClient;
use crate::output::{self, OutputFormat};
use crate::SyncCommands;

pub async fn handle(
    action: SyncCommands,
    client: &ApiClient,
    credentials: &dyn CredentialStore,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let vendor = vendor_client(credentials).await?;
    match action {
        SyncCommands::Pull => {
            let forms = vendor.list_remote().await?;
            format.print_forms(&forms)?;
        }
        SyncCommands::Push => {
            let forms: Vec<Form> = client.get("/api/forms").await?;
            vendor.save_remote(&forms).await?;
            output::success(&format!("Pushed {} forms to {}", forms.len(), vendor.base_url()));
        }
    }
    Ok(())
}

/// Environment first, then the profile's saved credentials.
async fn vendor_client(store: &dyn CredentialStore) -> anyhow::Result<PromptIoClient> {
    let from_env = match (std::env::var("PROMPTIO_SUBDOMAIN"), std::env::var("PROMPTIO_API_KEY")) {
        (Ok(subdomain), Ok(token)) => VendorCredentials::new(subdomain, token),
        _ => None,
    };
    let credentials = match from_env {
        Some(credentials) => credentials,
        None => store
            .get_credentials()
            .await?
            .context("no Prompt.io credentials; run `formbuilder config set subdomain ...` and `... token ...`")?,
    };

    let domain = std::env::var("PROMPTIO_DOMAIN").unwrap_or_else(|_| DEFAULT_VENDOR_DOMAIN.into());
    Ok(PromptIoClient::new(&credentials, &domain, Duration::from_secs(30))?)
}
