use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for a LibreTranslate server
#[derive(Debug)]
pub struct LibreTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the instance
    endpoint: String,
    /// Optional API key, required by most public instances
    api_key: String,
}

/// Request body for `POST /translate`
#[derive(Debug, Serialize)]
pub struct LibreTranslateRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language, always auto-detected
    source: &'a str,
    /// Target language subtag
    target: &'a str,
    /// Plain text, never HTML
    format: &'a str,
    /// API key when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Successful response body
#[derive(Debug, Deserialize)]
pub struct LibreTranslateResponse {
    /// The translated text
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Error response body
#[derive(Debug, Deserialize)]
struct LibreTranslateError {
    error: String,
}

impl LibreTranslate {
    /// Create a new LibreTranslate client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Provider for LibreTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = LibreTranslateRequest {
            q: text,
            source: "auto",
            target: target_language,
            format: "text",
            api_key: (!self.api_key.is_empty()).then_some(self.api_key.as_str()),
        };

        let response = self.client.post(self.url("translate"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LibreTranslateError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            error!("LibreTranslate error ({}): {}", status, message);

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
                StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.json::<LibreTranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(body.translated_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.url("languages")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "language list request failed".to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        "LibreTranslate"
    }
}
