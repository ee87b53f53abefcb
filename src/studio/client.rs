//! Studio HTTP client.
//!
//! Base URL and key come from config. Auth: `Authorization: Bearer {key}`
//! when a key is configured; reads are otherwise anonymous.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tracing::debug;

use super::{JobSnapshot, StudioJobs};
use crate::config::{AppConfig, StudioConfig};

pub struct StudioClient {
    http: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl StudioClient {
    pub fn new(base_url: &str, api_key: Option<Secret<String>>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("PADDOCK/0.1.0 (syndication-console)")
            .build()
            .context("Failed to build HTTP client for Studio")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build from config. `None` when Studio is disabled.
    pub fn from_config(cfg: &StudioConfig) -> Result<Option<Self>> {
        if !cfg.enabled {
            return Ok(None);
        }
        let api_key = match cfg.api_key_env.as_deref() {
            Some(env) => Some(Secret::new(AppConfig::resolve_env(env)?)),
            None => None,
        };
        Ok(Some(Self::new(&cfg.base_url, api_key)?))
    }

    pub fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, urlencoding::encode(job_id))
    }
}

#[async_trait]
impl StudioJobs for StudioClient {
    async fn fetch_job(&self, job_id: &str) -> Result<JobSnapshot> {
        let url = self.job_url(job_id);
        debug!(url = %url, "Fetching Studio job");

        let mut req = self.http.get(&url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }

        let resp = req.send().await.context("Studio API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Studio API error {status}: {body}");
        }

        resp.json::<JobSnapshot>()
            .await
            .context("Failed to parse Studio job response")
    }
}
