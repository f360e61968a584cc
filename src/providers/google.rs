use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Longest text the public endpoint accepts in a single request
pub const MAX_TEXT_CHARS: usize = 5000;

/// Client for the public Google Translate endpoint
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://translate.googleapis.com`
    endpoint: String,
}

impl Google {
    /// Create a new Google Translate client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn api_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Join the translated segments of a `translate_a/single` response.
    ///
    /// The body is a nested array whose first element lists sentence
    /// segments as `[translated, original, ...]`.
    pub fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing translation segments".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(ProviderError::ParseError("response contained no translated text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for Google {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ProviderError::RequestFailed(format!(
                "text is longer than {} characters",
                MAX_TEXT_CHARS
            )));
        }

        let response = self
            .client
            .get(self.api_url())
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!(
                "Google Translate answered {}",
                status
            )));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        debug!("Google Translate answered for target '{}'", target_language);
        Self::extract_text(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate("Hello", "es").await.map(|_| ())
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
