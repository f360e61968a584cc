/*!
 * Tests for provider construction and the mock provider
 */

use sheetlate::app_config::{Config, TranslationProvider};
use sheetlate::providers::{self, Provider};
use sheetlate::providers::google::Google;
use sheetlate::providers::mock::MockProvider;
use serde_json::json;

#[test]
fn test_from_config_withDefaultConfig_shouldBuildGoogle() {
    let provider = providers::from_config(&Config::default().translation).unwrap();
    assert_eq!(provider.name(), "Google Translate");
}

#[test]
fn test_from_config_withLibreTranslate_shouldBuildLibreTranslate() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LibreTranslate;
    let provider = providers::from_config(&config.translation).unwrap();
    assert_eq!(provider.name(), "LibreTranslate");
}

#[test]
fn test_google_extract_text_withSingleSegment_shouldReturnIt() {
    let body = json!([[["Bonjour", "Hello", null, null, 1]], null, "en"]);
    assert_eq!(Google::extract_text(&body).unwrap(), "Bonjour");
}

#[tokio::test]
async fn test_mock_calls_shouldRecordTextAndLanguage() {
    let mock = MockProvider::working();
    mock.translate("Hello", "pt").await.unwrap();
    mock.translate("World", "pt").await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].text, "World");
    assert_eq!(calls[1].target_language, "pt");
}

#[tokio::test(start_paused = true)]
async fn test_mock_slow_shouldTakeConfiguredDelay() {
    let mock = MockProvider::slow(250);
    let start = tokio::time::Instant::now();
    mock.translate("Hello", "es").await.unwrap();
    assert_eq!(start.elapsed(), std::time::Duration::from_millis(250));
}
