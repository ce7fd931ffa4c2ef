//! HTTP transport for the analysis backend
//!
//! Posts the source text as JSON and decodes the backend's result record.
//! A single attempt is made per call; retrying is left to the user.

use super::{AnalysisBackend, AnalysisResult};
use crate::config::BackendConfig;
use crate::error::{Result, StudioError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Request body sent to the backend
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    code: &'a str,
}

/// Analysis backend reached over HTTP
pub struct HttpAnalysisBackend {
    client: Client,
    url: String,
}

impl HttpAnalysisBackend {
    /// Create a backend posting to `url`
    ///
    /// `timeout` bounds each request; `None` waits as long as the
    /// backend takes.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(StudioError::InvalidConfig(
                "backend URL cannot be empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StudioError::Network(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Create a backend from the `[backend]` config section
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            config.url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    /// Endpoint this backend posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, source: &str) -> Result<AnalysisResult> {
        debug!("Posting {} bytes to {}", source.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&AnalyzeRequest { code: source })
            .send()
            .await
            .map_err(|e| StudioError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                body
            };
            return Err(StudioError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StudioError::Network(e.to_string()))?;
        let result: AnalysisResult = serde_json::from_slice(&body)?;

        debug!(
            "Backend answered: {} diagnostics, context: {}, inference: {}",
            result.errors.len(),
            result.context.is_some(),
            result.inference.is_some()
        );

        Ok(result)
    }
}
