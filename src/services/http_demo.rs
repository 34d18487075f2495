//! Outbound HTTP call used by the demo page

use serde::Serialize;

use crate::{
    config::DemoConfig,
    error::{AppError, AppResult},
};

const EXCERPT_LENGTH: usize = 500;

#[derive(Debug, Serialize)]
pub struct HttpCallResult {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// First characters of the response body
    pub excerpt: String,
}

#[derive(Clone)]
pub struct HttpDemoService {
    client: reqwest::Client,
    url: String,
}

impl HttpDemoService {
    pub fn new(config: &DemoConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("library-demo/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.http_call_url.clone(),
        })
    }

    pub async fn call(&self) -> AppResult<HttpCallResult> {
        tracing::debug!(url = %self.url, "calling remote service");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read response body: {}", e)))?;

        Ok(HttpCallResult {
            url: self.url.clone(),
            status,
            content_type,
            excerpt: body.chars().take(EXCERPT_LENGTH).collect(),
        })
    }
}
