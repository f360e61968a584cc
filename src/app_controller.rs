use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::file_utils::{FileManager, TableFormat};
use crate::language_utils;
use crate::providers::Provider;
use crate::session::Session;
use crate::table::Table;
use crate::translation::pipeline::{CancellationFlag, ProgressEvent, RunSummary, TranslationPipeline};
use crate::translation::TranslationService;

// @module: Application controller for spreadsheet translation

/// File written next to the output when cells failed
pub const ISSUES_LOG_FILE_NAME: &str = "sheetlate.issues.log";

/// What to translate and where to put it
#[derive(Debug, Clone, Default)]
pub struct TranslateRequest {
    /// Spreadsheet to read
    pub input: PathBuf,
    /// Column to translate; falls back to the configured one
    pub source_column: Option<String>,
    /// Target languages; `None` falls back to the configured ones
    pub languages: Option<Vec<String>>,
    /// Output file; defaults to `<prefix><input name>` next to the input
    pub output: Option<PathBuf>,
    /// Ask the provider for a test answer before starting
    pub check_connection: bool,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub issues_log: Option<PathBuf>,
    pub summary: RunSummary,
}

/// Main application controller for spreadsheet translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Set by the CLI on Ctrl-C
    cancel: CancellationFlag,
    // @field: Render indicatif bars
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self {
            config,
            cancel: CancellationFlag::new(),
            show_progress: true,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle used to stop a running translation between rows
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Run with the provider selected in the configuration
    pub async fn run(&self, request: TranslateRequest) -> Result<RunReport> {
        let service = TranslationService::from_config(&self.config.translation)
            .context("Failed to create translation provider")?;
        self.run_with_service(request, &service).await
    }

    /// Run with an explicit provider, keeping the configured retry and pacing
    pub async fn run_with_provider(&self, request: TranslateRequest, provider: Arc<dyn Provider>) -> Result<RunReport> {
        let service = TranslationService::with_provider(provider, &self.config.translation);
        self.run_with_service(request, &service).await
    }

    async fn run_with_service(&self, request: TranslateRequest, service: &TranslationService) -> Result<RunReport> {
        if !FileManager::file_exists(&request.input) {
            return Err(anyhow!("Input file does not exist: {:?}", request.input));
        }

        let languages = match &request.languages {
            Some(languages) => language_utils::dedupe_languages(languages),
            None => language_utils::dedupe_languages(&self.config.target_languages),
        };
        if languages.is_empty() {
            return Err(PipelineError::NoTargetLanguages.into());
        }
        for language in &languages {
            language_utils::validate_language_identifier(language)?;
        }

        let mut session = Session::load(&request.input)
            .with_context(|| format!("Failed to read {:?}", request.input))?;

        let source_column = request
            .source_column
            .clone()
            .or_else(|| self.config.source_column.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No source column given. Available columns: {}",
                    session.table().fields().join(", ")
                )
            })?;
        if !session.table().has_field(&source_column) {
            return Err(PipelineError::UnknownSourceField {
                field: source_column,
                available: session.table().fields().join(", "),
            }
            .into());
        }

        if request.check_connection {
            info!("Checking connection to {}", service.provider_name());
            service
                .test_connection()
                .await
                .with_context(|| format!("{} is not reachable", service.provider_name()))?;
        }

        let summary = self
            .translate_session(&mut session, &source_column, &languages, service)
            .await?;

        let output_path = match request.output {
            Some(path) => path,
            None => Self::default_output_path(&request.input, &self.config.output_prefix),
        };
        FileManager::write_table(session.table(), &output_path)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        info!("Success: {}", output_path.display());

        let issues_log = self.write_issues_log(session.table(), &summary, &request.input, &output_path)?;

        info!(
            "Translation complete in {}: {} translated, {} failed",
            Self::format_duration(summary.elapsed),
            summary.total_translated(),
            summary.total_failed()
        );
        for line in summary.report().lines() {
            info!("{}", line);
        }

        Ok(RunReport {
            output_path,
            issues_log,
            summary,
        })
    }

    /// Translate a loaded session, rendering progress bars per language
    pub async fn translate_session(
        &self,
        session: &mut Session,
        source_column: &str,
        languages: &[String],
        service: &TranslationService,
    ) -> Result<RunSummary> {
        let pipeline = TranslationPipeline::new(service)
            .with_concurrency(self.config.translation.common.concurrent_requests)
            .with_cancellation(self.cancel.clone());

        let multi_progress = MultiProgress::new();
        let show_progress = self.show_progress;
        let mut current: Option<ProgressBar> = None;
        let mut failed_in_language = 0usize;

        let summary = session
            .translate(&pipeline, source_column, languages, |event| match event {
                ProgressEvent::LanguageStarted { language, target_field, total } => {
                    failed_in_language = 0;
                    let bar = if show_progress {
                        multi_progress.add(ProgressBar::new(total as u64))
                    } else {
                        ProgressBar::hidden()
                    };
                    bar.set_style(Self::progress_style());
                    bar.set_prefix(language);
                    bar.set_message(target_field);
                    current = Some(bar);
                }
                ProgressEvent::NothingToDo { language, target_field } => {
                    info!("{}: every row of '{}' is already translated", language, target_field);
                }
                ProgressEvent::RowCompleted { .. } => {
                    if let Some(bar) = &current {
                        bar.inc(1);
                    }
                }
                ProgressEvent::RowFailed { language, row, error, .. } => {
                    failed_in_language += 1;
                    warn!("{}: row {} failed: {}", language, row + 1, error);
                    if let Some(bar) = &current {
                        bar.inc(1);
                        bar.set_message(format!("{} failed", failed_in_language));
                    }
                }
                ProgressEvent::LanguageCompleted { translated, failed, .. } => {
                    if let Some(bar) = current.take() {
                        bar.finish_with_message(format!("{} translated, {} failed", translated, failed));
                    }
                }
                ProgressEvent::Cancelled { language, completed, total } => {
                    warn!("{}: cancelled after {}/{} rows", language, completed, total);
                    if let Some(bar) = current.take() {
                        bar.abandon_with_message("cancelled");
                    }
                }
            })
            .await?;

        Ok(summary)
    }

    fn progress_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:>6} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{prefix} [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }

    /// `<prefix><input name>` next to the input.
    ///
    /// Workbook formats that cannot be written are saved as `.xlsx`.
    pub fn default_output_path(input: &Path, prefix: &str) -> PathBuf {
        let output_dir = input.parent().unwrap_or_else(|| Path::new(""));
        let path = FileManager::generate_output_path(input, output_dir, prefix);
        let writable = path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == "csv" || ext == "xlsx"
            })
            .unwrap_or(false);

        match TableFormat::from_path(&path) {
            Ok(TableFormat::Xlsx) if !writable => path.with_extension("xlsx"),
            _ => path,
        }
    }

    /// Write `sheetlate.issues.log` next to the output when any target cell failed
    fn write_issues_log(
        &self,
        table: &Table,
        summary: &RunSummary,
        input: &Path,
        output: &Path,
    ) -> Result<Option<PathBuf>> {
        let failures: Vec<(usize, &str, &str)> = summary
            .languages
            .iter()
            .flat_map(|l| {
                table
                    .failed_cells(&l.target_field)
                    .into_iter()
                    .map(move |(row, marker)| (row, l.target_field.as_str(), marker))
            })
            .collect();

        let log_path = output
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ISSUES_LOG_FILE_NAME);

        if failures.is_empty() {
            // A log left by an earlier run would list cells that are now translated
            if log_path.is_file() {
                std::fs::remove_file(&log_path)
                    .with_context(|| format!("Failed to remove stale {:?}", log_path))?;
                info!("No failed cells left, removed {}", log_path.display());
            }
            return Ok(None);
        }

        let mut content = format!(
            "Translation issues - {}\nInput: {}\nOutput: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            input.display(),
            output.display()
        );
        for (row, field, marker) in &failures {
            content.push_str(&format!("[row {}] {}: {}\n", row + 1, field, marker));
        }
        content.push_str("\nRun the same command on the output file to retry these cells.\n");

        FileManager::write_to_file(&log_path, &content)?;
        warn!("{} cell(s) failed, see {}", failures.len(), log_path.display());
        Ok(Some(log_path))
    }

    /// Header and leading rows of a file, for the `columns` command
    pub fn preview(input: &Path, rows: usize) -> Result<Table> {
        let table = FileManager::read_table(input)
            .with_context(|| format!("Failed to read {:?}", input))?;
        Ok(table.preview(rows))
    }

    /// Write the sample workbook
    pub fn write_template(output: &Path) -> Result<()> {
        FileManager::write_template(output).with_context(|| format!("Failed to write template {:?}", output))?;
        info!("Template written to {}", output.display());
        Ok(())
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
