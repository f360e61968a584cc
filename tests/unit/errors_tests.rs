/*!
 * Tests for error types
 */

use sheetlate::errors::{PipelineError, ProviderError};

#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "unavailable".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - unavailable");
    assert_eq!(
        ProviderError::RateLimitExceeded("slow down".to_string()).to_string(),
        "Rate limit exceeded: slow down"
    );
}

#[test]
fn test_pipeline_error_unknown_source_shouldListAvailableColumns() {
    let error = PipelineError::UnknownSourceField {
        field: "title".to_string(),
        available: "id, desc".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("'title'"));
    assert!(message.contains("id, desc"));
}
