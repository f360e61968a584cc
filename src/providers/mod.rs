/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for machine translation engines:
 * - Google: the public Google Translate endpoint
 * - LibreTranslate: self hosted or public LibreTranslate instances
 * - Mock: scripted in-process provider used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation engines
///
/// Implementations make exactly one request per call. Retries, pacing and
/// failure recording are owned by the translation service, so providers
/// must not retry on their own.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate `text` into `target_language`, auto-detecting the source
    ///
    /// # Arguments
    /// * `text` - Non-empty text to translate
    /// * `target_language` - Base language subtag such as `pt` or `fr`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Human readable provider name used in logs
    fn name(&self) -> &str;
}

/// Build the provider selected in the configuration
pub fn from_config(config: &TranslationConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let endpoint = config.get_endpoint();
    let timeout = config.get_timeout();

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Google => Arc::new(google::Google::new(endpoint, timeout)?),
        TranslationProvider::LibreTranslate => Arc::new(libretranslate::LibreTranslate::new(
            endpoint,
            config.get_api_key(),
            timeout,
        )?),
    };
    Ok(provider)
}

pub mod google;
pub mod libretranslate;
pub mod mock;
