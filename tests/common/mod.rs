/*!
 * Common test utilities for the sheetlate test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use sheetlate::app_config::Config;
use sheetlate::providers::mock::MockProvider;
use sheetlate::table::Table;
use sheetlate::translation::{RetryPolicy, TranslationService};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small product CSV with an `id` and a `desc` column
pub fn create_test_csv(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "id,desc\n1,Hello\n2,\n3,World\n")
}

/// Three rows where the middle source cell is empty
pub fn sample_table() -> Table {
    let mut table = Table::new(["id", "desc"]);
    table.push_row(["1", "Hello"]);
    table.push_row(["2", ""]);
    table.push_row(["3", "World"]);
    table
}

/// Service without pacing or cache whose backoff is `backoff_ms`
pub fn service_with(provider: MockProvider, max_attempts: u32, backoff_ms: u64) -> TranslationService {
    TranslationService::new(
        Arc::new(provider),
        RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
        Duration::ZERO,
        false,
    )
}

/// Configuration that keeps tests fast
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.source_column = Some("desc".to_string());
    config.target_languages = vec!["es".to_string()];
    config.translation.common.retry_backoff_ms = 1;
    config.translation.common.request_delay_ms = 0;
    config
}

/// Initialize a test logger once; further calls are no-ops
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
