//! Vendor credentials
//!
//! The Prompt.io adapter needs an organisation subdomain and an API token.
//! They come from the process environment, from the request host
//! (`acme.prompt.io` → `acme`), or from a [`CredentialStore`].

use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;

use crate::{FormsError, Result};

pub const DEFAULT_VENDOR_DOMAIN: &str = "prompt.io";

/// Subdomain + token pair for the Prompt.io API.
#[derive(Clone, PartialEq, Eq)]
pub struct VendorCredentials {
    pub subdomain: String,
    pub token: String,
}

impl VendorCredentials {
    /// Both members must be non-blank.
    pub fn new(subdomain: impl Into<String>, token: impl Into<String>) -> Option<Self> {
        let subdomain = subdomain.into().trim().to_string();
        let token = token.into().trim().to_string();
        (!subdomain.is_empty() && !token.is_empty()).then_some(Self { subdomain, token })
    }

    /// First three characters followed by `...`, for diagnostics.
    pub fn masked_subdomain(&self) -> String {
        let head: String = self.subdomain.chars().take(3).collect();
        format!("{head}...")
    }
}

impl fmt::Debug for VendorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorCredentials")
            .field("subdomain", &self.subdomain)
            .field("token", &"[redacted]")
            .finish()
    }
}

/// Organisation subdomain from a `Host` value under `domain`.
///
/// `acme.prompt.io:443` → `acme`. The bare domain and unrelated hosts yield
/// `None`.
pub fn subdomain_from_host(host: &str, domain: &str) -> Option<String> {
    let host = host.trim().split(':').next()?.to_ascii_lowercase();
    let suffix = format!(".{}", domain.to_ascii_lowercase());
    let label = host.strip_suffix(&suffix)?;
    (!label.is_empty() && !label.contains('.')).then(|| label.to_string())
}

/// Pick credentials. A subdomain derived from the request host wins over
/// the configured one.
pub fn resolve_credentials(
    host: Option<&str>,
    configured_subdomain: Option<&str>,
    token: Option<&str>,
    domain: &str,
) -> Result<VendorCredentials> {
    let subdomain = host
        .and_then(|h| subdomain_from_host(h, domain))
        .or_else(|| {
            configured_subdomain
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .ok_or_else(|| FormsError::ConfigMissing("PROMPTIO_SUBDOMAIN is not set".into()))?;

    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FormsError::ConfigMissing("PROMPTIO_API_KEY is not set".into()))?;

    VendorCredentials::new(subdomain, token)
        .ok_or_else(|| FormsError::ConfigMissing("vendor credentials are blank".into()))
}

/// Somewhere credentials can be kept between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_credentials(&self) -> Result<Option<VendorCredentials>>;

    async fn set_credentials(&self, credentials: VendorCredentials) -> Result<()>;
}

/// Process-local credential store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<Option<VendorCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: Option<VendorCredentials>) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_credentials(&self) -> Result<Option<VendorCredentials>> {
        Ok(self.credentials.read().clone())
    }

    async fn set_credentials(&self, credentials: VendorCredentials) -> Result<()> {
        *self.credentials.write() = Some(credentials);
        Ok(())
    }
}
