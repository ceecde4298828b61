//! CLI Commands

pub mod config;
pub mod forms;
pub mod sync;

use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Form Builder API client
pub struct ApiClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let req = self.client.get(self.url(path));
        data(self.send(req).await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let req = self.client.post(self.url(path)).json(body);
        data(self.send(req).await?)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let req = self.client.put(self.url(path)).json(body);
        data(self.send(req).await?)
    }

    /// DELETE, returning the server's message.
    pub async fn delete(&self, path: &str) -> anyhow::Result<String> {
        let req = self.client.delete(self.url(path));
        let json = self.send(req).await?;
        Ok(json["message"].as_str().unwrap_or("deleted").to_string())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> anyhow::Result<Value> {
        let resp = req.send().await.with_context(|| format!("cannot reach {}", self.base_url))?;
        let status = resp.status();
        let json: Value = resp.json().await.with_context(|| format!("unexpected response ({status})"))?;

        if !status.is_success() || json["success"] == Value::Bool(false) {
            let message = json["message"].as_str().unwrap_or("request failed");
            bail!("{} ({})", message, status);
        }
        Ok(json)
    }
}

fn data<T: DeserializeOwned>(mut json: Value) -> anyhow::Result<T> {
    let data = json
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| anyhow!("No data in response"))?;
    Ok(serde_json::from_value(data)?)
}
