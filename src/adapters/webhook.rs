use crate::core::{ConfigProvider, ResponseSource};
use crate::utils::error::{CourseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

const PREVIEW_CHARS: usize = 200;

/// Posts `{"theme": ...}` to the generator webhook and returns the raw body.
#[derive(Debug, Clone)]
pub struct WebhookSource {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
}

impl WebhookSource {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        headers: HashMap<String, String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            headers,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.endpoint(),
            Duration::from_secs(config.timeout_seconds()),
            config.headers().clone(),
        )
    }
}

#[async_trait]
impl ResponseSource for WebhookSource {
    async fn fetch(&self, theme: &str) -> Result<String> {
        tracing::debug!("Posting theme to webhook: {}", self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "theme": theme }));
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Webhook response status: {}", status);

        if !status.is_success() {
            return Err(CourseError::ApiStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(CourseError::EmptyResponse);
        }

        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        tracing::debug!(bytes = body.len(), %preview, "Received raw response");
        Ok(body)
    }
}
