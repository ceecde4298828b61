//! Server configuration
//!
//! Loaded from an optional JSON file, then overridden from the environment.
//!
//! | Env Var                         | Default                  |
//! |---------------------------------|--------------------------|
//! | `FORMBUILDER_BIND`              | `0.0.0.0:3000`           |
//! | `FORMBUILDER_PUBLIC_URL`        | `http://localhost:3000`  |
//! | `FORMBUILDER_HTTP_TIMEOUT_SECS` | `10`                     |
//! | `FORMBUILDER_SEED_SAMPLES`      | `true`                   |
//! | `PROMPTIO_SUBDOMAIN`            | unset                    |
//! | `PROMPTIO_API_KEY`              | unset                    |
//! | `PROMPTIO_DOMAIN`               | `prompt.io`              |
//! | `PROMPTIO_BASE_URL`             | `https://{sub}.{domain}` |
//! | `PROMPTIO_SCHEMA_ID`            | `30`                     |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use formbuilder_core::credentials::{resolve_credentials, DEFAULT_VENDOR_DOMAIN};
use formbuilder_core::{FormsError, PromptIoClient, VendorCredentials};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Origin used in generated embed snippets
    pub public_url: String,
    /// Timeout for every outbound call
    pub http_timeout_secs: u64,
    /// Seed the local store with the demo forms
    pub seed_samples: bool,
    pub vendor: VendorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".into(),
            public_url: "http://localhost:3000".into(),
            http_timeout_secs: 10,
            seed_samples: true,
            vendor: VendorConfig::default(),
        }
    }
}

/// Prompt.io settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    pub subdomain: Option<String>,
    pub api_key: Option<String>,
    pub domain: String,
    pub base_url: Option<String>,
    pub schema_id: u32,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            subdomain: None,
            api_key: None,
            domain: DEFAULT_VENDOR_DOMAIN.into(),
            base_url: None,
            schema_id: 30,
        }
    }
}

impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("subdomain", &self.subdomain)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

impl ServerConfig {
    /// File (when present) then process environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if Path::new(path).exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `FORMBUILDER_*` / `PROMPTIO_*` overrides from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind) = var("FORMBUILDER_BIND") {
            self.bind = bind;
        }
        if let Some(url) = var("FORMBUILDER_PUBLIC_URL") {
            self.public_url = url;
        }
        if let Some(secs) = var("FORMBUILDER_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse("FORMBUILDER_HTTP_TIMEOUT_SECS", secs)?;
        }
        if let Some(seed) = var("FORMBUILDER_SEED_SAMPLES") {
            self.seed_samples = parse("FORMBUILDER_SEED_SAMPLES", seed)?;
        }
        if let Some(subdomain) = var("PROMPTIO_SUBDOMAIN") {
            self.vendor.subdomain = Some(subdomain);
        }
        if let Some(key) = var("PROMPTIO_API_KEY") {
            self.vendor.api_key = Some(key);
        }
        if let Some(domain) = var("PROMPTIO_DOMAIN") {
            self.vendor.domain = domain;
        }
        if let Some(base_url) = var("PROMPTIO_BASE_URL") {
            self.vendor.base_url = Some(base_url);
        }
        if let Some(schema_id) = var("PROMPTIO_SCHEMA_ID") {
            self.vendor.schema_id = parse("PROMPTIO_SCHEMA_ID", schema_id)?;
        }
        Ok(self)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Host part of the public URL, used for subdomain detection.
    pub fn public_host(&self) -> Option<String> {
        url::Url::parse(&self.public_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Vendor credentials for a request arriving on `host`, falling back to
    /// the configured subdomain.
    pub fn vendor_credentials(&self, host: Option<&str>) -> Result<VendorCredentials, FormsError> {
        resolve_credentials(
            host,
            self.vendor.subdomain.as_deref(),
            self.vendor.api_key.as_deref(),
            &self.vendor.domain,
        )
    }

    /// Prompt.io client, honoring a `base_url` override.
    pub fn prompt_io_client(&self, credentials: &VendorCredentials) -> Result<PromptIoClient, FormsError> {
        match &self.vendor.base_url {
            Some(base_url) => PromptIoClient::with_base_url(base_url, &credentials.token, self.http_timeout()),
            None => PromptIoClient::new(credentials, &self.vendor.domain, self.http_timeout()),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value })
}
