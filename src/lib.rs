/*!
 * # sheetlate - resumable column translation for spreadsheets
 *
 * A Rust library for translating one column of a spreadsheet into several
 * languages through machine translation services.
 *
 * ## Features
 *
 * - Read CSV and Excel workbooks, write CSV or XLSX
 * - Translate through Google Translate or LibreTranslate
 * - One new column per language, named `<column>_<language>`
 * - Bounded retries with exponential backoff and request pacing
 * - Failed cells are marked and retried on the next run; translated cells
 *   are never overwritten
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `table`: In-memory table and cell translation states
 * - `translation`: Translation services:
 *   - `translation::core`: Per-cell translation with retries
 *   - `translation::retry`: Exponential backoff helper
 *   - `translation::pacer`: Request pacing
 *   - `translation::cache`: Caching of successful translations
 *   - `translation::pipeline`: Per-language orchestration loop
 * - `session`: Caller-owned state for a loaded spreadsheet
 * - `file_utils`: CSV and workbook reading and writing
 * - `app_controller`: Main application controller
 * - `language_utils`: Language identifier utilities
 * - `providers`: Client implementations for translation services:
 *   - `providers::google`: Google Translate client
 *   - `providers::libretranslate`: LibreTranslate client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod table;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use session::Session;
pub use table::{CellState, Table};
pub use translation::{
    CancellationFlag, ProgressEvent, RunSummary, TranslationOutcome, TranslationPipeline, TranslationService,
};
