/*!
 * Translation of spreadsheet columns through external engines.
 *
 * It is split into several submodules:
 *
 * - `core`: the per-cell translation service and its outcome type
 * - `retry`: bounded retries with exponential backoff
 * - `pacer`: minimum spacing between provider calls
 * - `cache`: memo of successful translations
 * - `pipeline`: the per-language orchestration loop
 */

// Re-export main types for easier usage
pub use self::core::{TranslationOutcome, TranslationService};
pub use self::pipeline::{CancellationFlag, ProgressEvent, RunSummary, TranslationPipeline};
pub use self::retry::{RetryPolicy, retry_with_backoff};

// Submodules
pub mod cache;
pub mod core;
pub mod pacer;
pub mod pipeline;
pub mod retry;
