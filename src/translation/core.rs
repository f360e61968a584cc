/*!
 * Core translation service implementation.
 *
 * `TranslationService` turns one cell value and one language identifier into
 * a `TranslationOutcome`. Provider errors never escape: they are retried with
 * backoff and, once the attempts run out, folded into a failure marker.
 */

use log::{debug, error};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{self, Provider};
use crate::table;

use super::cache::TranslationCache;
use super::pacer::Pacer;
use super::retry::{RetryPolicy, retry_with_backoff};

/// Result of translating one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Translated text; never matches the failure marker pattern
    Translated(String),
    /// Failure marker embedding the last provider error
    Failed(String),
}

impl TranslationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Translated(text) | Self::Failed(text) => text,
        }
    }

    /// The value written into the table cell
    pub fn into_cell_value(self) -> String {
        match self {
            Self::Translated(text) | Self::Failed(text) => text,
        }
    }
}

impl fmt::Display for TranslationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main translation service used by the pipeline
#[derive(Debug)]
pub struct TranslationService {
    /// External engine
    provider: Arc<dyn Provider>,

    /// Attempts and backoff per cell
    policy: RetryPolicy,

    /// Call-rate budget shared by every request from this service
    pacer: Pacer,

    /// Memo of successful translations
    cache: TranslationCache,
}

impl TranslationService {
    /// Create a service around an existing provider
    pub fn new(provider: Arc<dyn Provider>, policy: RetryPolicy, min_interval: Duration, cache_enabled: bool) -> Self {
        Self {
            provider,
            policy,
            pacer: Pacer::new(min_interval),
            cache: TranslationCache::new(cache_enabled),
        }
    }

    /// Build the configured provider and wrap it with the configured policy
    pub fn from_config(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let provider = providers::from_config(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Wrap `provider` using the retry, pacing and cache settings of `config`
    pub fn with_provider(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self::new(
            provider,
            RetryPolicy::from_config(&config.common),
            config.min_request_interval(),
            config.common.cache_enabled,
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Check that the provider answers before starting a run
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.pacer.wait().await;
        self.provider.test_connection().await
    }

    /// Translate one cell value into `language`.
    ///
    /// Absent, empty and whitespace-only input yields `Translated("")`
    /// without contacting the provider. `language` may carry a region
    /// subtag; only the lowercased base subtag reaches the provider.
    pub async fn translate(&self, text: Option<&str>, language: &str) -> TranslationOutcome {
        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return TranslationOutcome::Translated(String::new()),
        };

        let subtag = language_utils::base_subtag(language);
        if let Some(cached) = self.cache.get(text, &subtag) {
            return TranslationOutcome::Translated(cached);
        }

        let subtag = subtag.as_str();
        let result = retry_with_backoff(&self.policy, move |attempt| async move {
            self.pacer.wait().await;
            debug!(
                "{} request for '{}' (attempt {}/{})",
                self.provider.name(),
                subtag,
                attempt + 1,
                self.policy.max_attempts
            );
            let translated = self.provider.translate(text, subtag).await?;
            check_translation(translated)
        })
        .await;

        match result {
            Ok(translated) => {
                self.cache.store(text, subtag, &translated);
                TranslationOutcome::Translated(translated)
            }
            Err(e) => {
                error!(
                    "Translation to '{}' failed after {} attempts: {}",
                    language, self.policy.max_attempts, e
                );
                TranslationOutcome::Failed(table::failure_marker(&e.to_string()))
            }
        }
    }
}

/// Reject provider answers that would be indistinguishable from a failure
fn check_translation(translated: String) -> Result<String, ProviderError> {
    if translated.trim().is_empty() {
        return Err(ProviderError::ParseError("provider returned an empty translation".to_string()));
    }
    if table::is_failure_marker(&translated) {
        return Err(ProviderError::ParseError(format!(
            "provider returned a value that looks like a failure marker: {}",
            translated
        )));
    }
    Ok(translated)
}
