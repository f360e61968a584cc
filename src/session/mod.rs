/*!
 * Session management for a loaded spreadsheet.
 *
 * A `Session` is owned by the caller. It keeps the table as loaded, the
 * working copy the pipeline fills in, and the file name used to derive the
 * output name. Running the pipeline again on the same session only retries
 * empty and failed cells.
 */

pub mod models;

pub use models::SessionInfo;

use chrono::Local;
use log::info;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{PipelineError, TableError};
use crate::file_utils::FileManager;
use crate::table::Table;
use crate::translation::pipeline::{ProgressEvent, RunSummary, TranslationPipeline};

/// Name given to sessions started from the sample workbook
pub const TEMPLATE_FILE_NAME: &str = "template.xlsx";

/// A spreadsheet being translated
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    file_name: String,
    source_path: Option<PathBuf>,
    original: Table,
    table: Table,
    runs: usize,
    created_at: String,
}

impl Session {
    /// Start a session from an in-memory table
    pub fn new(file_name: impl Into<String>, table: Table) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            source_path: None,
            original: table.clone(),
            table,
            runs: 0,
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Read a CSV or workbook file into a new session
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = FileManager::read_table(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut session = Self::new(file_name, table);
        session.source_path = Some(path.to_path_buf());
        info!("Loaded {}", session.info().describe());
        Ok(session)
    }

    /// Start from the sample workbook offered to new users
    pub fn template() -> Self {
        Self::new(TEMPLATE_FILE_NAME, FileManager::template_table())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The working table, including translations so far
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// The table exactly as loaded
    pub fn original(&self) -> &Table {
        &self.original
    }

    /// Whether any translation has been written since loading
    pub fn is_modified(&self) -> bool {
        self.table != self.original
    }

    /// Discard all translations and go back to the loaded table
    pub fn reset(&mut self) {
        self.table = self.original.clone();
        self.runs = 0;
    }

    /// Run the pipeline on the working table
    pub async fn translate<S, F>(
        &mut self,
        pipeline: &TranslationPipeline<'_>,
        source_field: &str,
        languages: &[S],
        on_progress: F,
    ) -> Result<RunSummary, PipelineError>
    where
        S: AsRef<str>,
        F: FnMut(ProgressEvent),
    {
        let summary = pipeline.run(&mut self.table, source_field, languages, on_progress).await?;
        self.runs += 1;
        Ok(summary)
    }

    /// Output file name: `prefix` followed by the loaded file name
    pub fn output_file_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.file_name)
    }

    /// Snapshot for display and logging
    pub fn info(&self) -> SessionInfo {
        let failed_cells = self
            .table
            .fields()
            .iter()
            .map(|field| self.table.failed_cells(field).len())
            .sum();

        SessionInfo {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            rows: self.table.row_count(),
            fields: self.table.fields().to_vec(),
            failed_cells,
            runs: self.runs,
            created_at: self.created_at.clone(),
        }
    }
}
