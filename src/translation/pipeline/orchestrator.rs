/*!
 * Per-language orchestration of a translation run.
 *
 * For every target language, in caller order, the orchestrator scans the
 * table for rows whose source cell has text and whose target cell is empty
 * or failed, translates those rows in ascending order and writes each
 * result back before the next one is reported. Successful cells are never
 * overwritten, so running the same table again only retries the gaps.
 */

use futures::future;
use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::time::Instant;

use crate::errors::PipelineError;
use crate::language_utils;
use crate::table::Table;
use crate::translation::core::{TranslationOutcome, TranslationService};

use super::progress::{CancellationFlag, LanguageSummary, ProgressEvent, RunSummary};

/// Lifecycle of one language inside a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageState {
    /// Looking for rows that need work
    Scanning,
    /// Translating the selected rows
    Translating,
    /// Finished, or nothing to do
    Done,
}

/// Drives a `TranslationService` over a table
#[derive(Debug)]
pub struct TranslationPipeline<'a> {
    service: &'a TranslationService,
    concurrency: usize,
    cancel: CancellationFlag,
}

impl<'a> TranslationPipeline<'a> {
    /// Sequential pipeline without cancellation
    pub fn new(service: &'a TranslationService) -> Self {
        Self {
            service,
            concurrency: 1,
            cancel: CancellationFlag::new(),
        }
    }

    /// Allow up to `concurrency` translations in flight per language
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Stop between rows once `cancel` is set
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Translate `source_field` into every language of `languages`.
    ///
    /// Identifiers are trimmed and deduplicated first. An unknown source
    /// field or an empty language list is rejected before anything is
    /// written. Individual translation failures never abort the run; they
    /// end up as failure markers in the table and `RowFailed` events.
    pub async fn run<S, F>(
        &self,
        table: &mut Table,
        source_field: &str,
        languages: &[S],
        mut on_progress: F,
    ) -> Result<RunSummary, PipelineError>
    where
        S: AsRef<str>,
        F: FnMut(ProgressEvent),
    {
        let languages = language_utils::dedupe_languages(languages);
        if languages.is_empty() {
            return Err(PipelineError::NoTargetLanguages);
        }
        if !table.has_field(source_field) {
            return Err(PipelineError::UnknownSourceField {
                field: source_field.to_string(),
                available: table.fields().join(", "),
            });
        }

        let started = Instant::now();
        let mut summary = RunSummary::default();

        info!(
            "Translating '{}' into {} language(s) with {}",
            source_field,
            languages.len(),
            self.service.provider_name()
        );

        for language in &languages {
            if self.cancel.is_cancelled() {
                on_progress(ProgressEvent::Cancelled {
                    language: language.clone(),
                    completed: 0,
                    total: 0,
                });
                summary.cancelled = true;
                break;
            }

            let (language_summary, cancelled) = self
                .translate_language(table, source_field, language, &mut on_progress)
                .await;
            summary.languages.push(language_summary);
            if cancelled {
                summary.cancelled = true;
                break;
            }
        }

        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    async fn translate_language<F>(
        &self,
        table: &mut Table,
        source_field: &str,
        language: &str,
        on_progress: &mut F,
    ) -> (LanguageSummary, bool)
    where
        F: FnMut(ProgressEvent),
    {
        let target_field = language_utils::target_field_name(source_field, language);
        table.add_field(target_field.as_str());

        let mut state = LanguageState::Scanning;
        debug!("{}: {:?}", language, state);
        let rows = table.rows_needing_translation(source_field, &target_field);

        let mut summary = LanguageSummary {
            language: language.to_string(),
            target_field: target_field.clone(),
            pending: rows.len(),
            translated: 0,
            failed: 0,
        };

        if rows.is_empty() {
            state = LanguageState::Done;
            debug!("{}: {:?}, nothing to do", language, state);
            on_progress(ProgressEvent::NothingToDo {
                language: language.to_string(),
                target_field,
            });
            return (summary, false);
        }

        state = LanguageState::Translating;
        debug!("{}: {:?} {} row(s)", language, state, rows.len());
        on_progress(ProgressEvent::LanguageStarted {
            language: language.to_string(),
            target_field: target_field.clone(),
            total: rows.len(),
        });

        let total = rows.len();
        let jobs: Vec<(usize, Option<String>)> = rows
            .into_iter()
            .map(|row| (row, table.get_cell(row, source_field).map(str::to_string)))
            .collect();

        let service = self.service;
        let cancel = &self.cancel;
        let mut results = stream::iter(jobs)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|(row, text)| async move {
                let outcome = service.translate(text.as_deref(), language).await;
                (row, outcome)
            })
            .buffered(self.concurrency);

        let mut completed = 0;
        while let Some((row, outcome)) = results.next().await {
            completed += 1;
            let event = match &outcome {
                TranslationOutcome::Translated(_) => {
                    summary.translated += 1;
                    ProgressEvent::RowCompleted {
                        language: language.to_string(),
                        completed,
                        total,
                        row,
                    }
                }
                TranslationOutcome::Failed(marker) => {
                    summary.failed += 1;
                    ProgressEvent::RowFailed {
                        language: language.to_string(),
                        completed,
                        total,
                        row,
                        error: marker.clone(),
                    }
                }
            };
            table.set_cell(row, &target_field, outcome.into_cell_value());
            on_progress(event);
        }

        if completed < total {
            info!("{}: cancelled after {}/{} row(s)", language, completed, total);
            on_progress(ProgressEvent::Cancelled {
                language: language.to_string(),
                completed,
                total,
            });
            return (summary, true);
        }

        state = LanguageState::Done;
        debug!("{}: {:?}", language, state);
        on_progress(ProgressEvent::LanguageCompleted {
            language: language.to_string(),
            translated: summary.translated,
            failed: summary.failed,
        });
        (summary, false)
    }
}
