/*!
 * Tests for the per-cell translation service: retries, backoff and pacing
 */

use std::sync::Arc;
use std::time::Duration;

use sheetlate::app_config::Config;
use sheetlate::providers::mock::MockProvider;
use sheetlate::table::is_failure_marker;
use sheetlate::translation::{RetryPolicy, TranslationOutcome, TranslationService};

use crate::common;

#[tokio::test(start_paused = true)]
async fn test_translate_withFailingProvider_shouldStopAtMaxAttempts() {
    let mock = MockProvider::failing();
    let service = common::service_with(mock.clone(), 3, 2000);

    let outcome = service.translate(Some("Hello"), "es").await;

    assert_eq!(mock.call_count(), 3);
    match outcome {
        TranslationOutcome::Failed(marker) => {
            assert!(is_failure_marker(&marker));
            assert!(marker.contains("Simulated provider failure"));
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_translate_withFailingProvider_shouldBackOffExponentially() {
    let mock = MockProvider::failing();
    let service = common::service_with(mock.clone(), 4, 2000);
    let start = tokio::time::Instant::now();

    service.translate(Some("Hello"), "es").await;

    let offsets: Vec<Duration> = mock.calls().iter().map(|call| call.at - start).collect();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::from_secs(6),
            Duration::from_secs(14),
        ]
    );
    // No sleep after the final attempt
    assert_eq!(start.elapsed(), Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn test_translate_withFlakyProvider_shouldRecoverWithinBudget() {
    let mock = MockProvider::flaky(2);
    let service = common::service_with(mock.clone(), 3, 2000);

    let outcome = service.translate(Some("Hello"), "fr").await;

    assert_eq!(outcome, TranslationOutcome::Translated("[fr] Hello".to_string()));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withSingleAttempt_shouldNotSleep() {
    let service = common::service_with(MockProvider::failing(), 1, 2000);
    let start = tokio::time::Instant::now();

    assert!(service.translate(Some("Hello"), "es").await.is_failed());
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_translate_withEmptyInput_shouldNotCallProvider() {
    let mock = MockProvider::failing();
    let service = common::service_with(mock.clone(), 3, 2000);

    assert_eq!(service.translate(Some(" \n "), "es").await.into_cell_value(), "");
    assert_eq!(service.translate(None, "es").await.into_cell_value(), "");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withPacing_shouldSpaceEveryCallIncludingRetries() {
    let mock = MockProvider::flaky(1);
    let service = TranslationService::new(
        Arc::new(mock.clone()),
        RetryPolicy::new(2, Duration::from_millis(50)),
        Duration::from_millis(300),
        false,
    );
    let start = tokio::time::Instant::now();

    service.translate(Some("a"), "es").await;
    service.translate(Some("b"), "es").await;

    let offsets: Vec<Duration> = mock.calls().iter().map(|call| call.at - start).collect();
    assert_eq!(
        offsets,
        vec![Duration::ZERO, Duration::from_millis(300), Duration::from_millis(600)]
    );
}

#[tokio::test]
async fn test_with_provider_shouldApplyConfiguredPolicy() {
    let mut config = Config::default();
    config.translation.common.max_attempts = 5;
    config.translation.common.retry_backoff_ms = 10;
    config.translation.common.cache_enabled = false;

    let service = TranslationService::with_provider(Arc::new(MockProvider::working()), &config.translation);

    assert_eq!(service.policy().max_attempts, 5);
    assert_eq!(service.policy().base_delay, Duration::from_millis(10));
    assert!(!service.cache().is_enabled());
    assert_eq!(service.provider_name(), "Mock");
}

#[tokio::test]
async fn test_test_connection_shouldReportProviderOutage() {
    assert!(common::service_with(MockProvider::working(), 1, 0).test_connection().await.is_ok());
    assert!(common::service_with(MockProvider::failing(), 1, 0).test_connection().await.is_err());
}
