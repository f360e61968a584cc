/*!
 * Row/column translation pipeline.
 *
 * - `orchestrator`: per-language scan, translate and write loop
 * - `progress`: progress events, cancellation and run summaries
 */

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{LanguageState, TranslationPipeline};
pub use progress::{CancellationFlag, LanguageSummary, ProgressEvent, RunSummary};
