use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Rows were found that need work for this language
    LanguageStarted {
        language: String,
        target_field: String,
        total: usize,
    },

    /// Every eligible cell of this language already holds a translation
    NothingToDo { language: String, target_field: String },

    /// A row was translated and written
    RowCompleted {
        language: String,
        completed: usize,
        total: usize,
        row: usize,
    },

    /// A row exhausted its attempts; its cell now holds a failure marker
    RowFailed {
        language: String,
        completed: usize,
        total: usize,
        row: usize,
        error: String,
    },

    /// All selected rows of this language were processed
    LanguageCompleted {
        language: String,
        translated: usize,
        failed: usize,
    },

    /// The run stopped early because cancellation was requested
    Cancelled {
        language: String,
        completed: usize,
        total: usize,
    },
}

/// Shared flag used to request a graceful stop.
///
/// Checked between rows, so the call in flight finishes and its result is
/// written before the run returns.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Request a stop on user interrupt.
    ///
    /// Returns `true` when a stop had already been requested, meaning the
    /// caller should give up waiting and exit.
    pub fn interrupt(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }
}

/// Outcome of one language in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSummary {
    /// Identifier as supplied by the caller, trimmed
    pub language: String,
    /// Field the translations were written to
    pub target_field: String,
    /// Rows selected for work by the scan
    pub pending: usize,
    /// Rows that now hold a translation
    pub translated: usize,
    /// Rows that now hold a failure marker
    pub failed: usize,
}

impl LanguageSummary {
    /// Nothing needed translating
    pub fn is_skipped(&self) -> bool {
        self.pending == 0
    }

    /// Selected rows that were never attempted because of cancellation
    pub fn not_attempted(&self) -> usize {
        self.pending - self.translated - self.failed
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub languages: Vec<LanguageSummary>,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total_translated(&self) -> usize {
        self.languages.iter().map(|l| l.translated).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.languages.iter().map(|l| l.failed).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.total_failed() > 0
    }

    /// One line per language, used for the end of run report
    pub fn report(&self) -> String {
        let mut lines: Vec<String> = self
            .languages
            .iter()
            .map(|l| {
                if l.is_skipped() {
                    format!("{} ({}): already complete", l.language, l.target_field)
                } else {
                    format!(
                        "{} ({}): {} translated, {} failed of {}",
                        l.language, l.target_field, l.translated, l.failed, l.pending
                    )
                }
            })
            .collect();
        if self.cancelled {
            lines.push("Run cancelled before all rows were processed".to_string());
        }
        lines.join("\n")
    }
}
