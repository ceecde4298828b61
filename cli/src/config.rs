//! CLI Configuration
//!
//! TOML settings under `~/.formbuilder/`, one file per profile.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use formbuilder_core::{CredentialStore, FormsError, VendorCredentials};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot find home directory")]
    NoHome,

    #[error("cannot access {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

pub const KEYS: [&str; 4] = ["api_url", "subdomain", "token", "default_format"];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub subdomain: Option<String>,
    pub token: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io)
    }

    pub fn config_path(profile: Option<&str>) -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".formbuilder").join(filename))
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let value = Some(value);
        match key {
            "api_url" => self.api_url = value,
            "subdomain" => self.subdomain = value,
            "token" => self.token = value,
            "default_format" => self.default_format = value,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Value for display; the token is masked.
    pub fn display_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "subdomain" => self.subdomain.clone(),
            "token" => self.token.as_deref().map(mask),
            "default_format" => self.default_format.clone(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        })
    }
}

fn mask(secret: &str) -> String {
    format!("{}****", secret.chars().take(4).collect::<String>())
}

/// Vendor credentials kept in a profile's settings file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn settings_error(err: ConfigError) -> FormsError {
    FormsError::ConfigMissing(format!("cannot use CLI settings: {err}"))
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get_credentials(&self) -> formbuilder_core::Result<Option<VendorCredentials>> {
        let config = Config::load_from(&self.path).map_err(settings_error)?;
        Ok(match (config.subdomain, config.token) {
            (Some(subdomain), Some(token)) => VendorCredentials::new(subdomain, token),
            _ => None,
        })
    }

    async fn set_credentials(&self, credentials: VendorCredentials) -> formbuilder_core::Result<()> {
        let mut config = Config::load_from(&self.path).map_err(settings_error)?;
        config.subdomain = Some(credentials.subdomain);
        config.token = Some(credentials.token);
        config.save_to(&self.path).map_err(settings_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("formbuilder-cli-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/formbuilder/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_and_mask() {
        let mut config = Config::default();
        config.set("token", "abcdef123456".into()).unwrap();
        config.set("api_url", "http://localhost:3000".into()).unwrap();
        assert_eq!(config.display_value("token").unwrap().as_deref(), Some("abcd****"));
        assert_eq!(config.display_value("api_url").unwrap().as_deref(), Some("http://localhost:3000"));
        assert!(matches!(config.set("tenant", "x".into()), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "api_url = [not toml").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path("reload");
        let mut config = Config::default();
        config.set("subdomain", "acme".into()).unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_credential_store() {
        let path = scratch_path("creds");
        let store = FileCredentialStore::new(path.clone());
        assert!(store.get_credentials().await.unwrap().is_none());

        let creds = VendorCredentials::new("acme", "tok").unwrap();
        store.set_credentials(creds.clone()).await.unwrap();
        assert_eq!(store.get_credentials().await.unwrap(), Some(creds));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
