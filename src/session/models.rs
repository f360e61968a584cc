/*!
 * Session-specific models.
 */

use serde::{Deserialize, Serialize};

/// High-level session information for display and tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session ID
    pub id: String,
    /// Name of the loaded file
    pub file_name: String,
    /// Number of data rows
    pub rows: usize,
    /// Field names in order
    pub fields: Vec<String>,
    /// Cells currently holding a failure marker
    pub failed_cells: usize,
    /// Completed pipeline runs on this table
    pub runs: usize,
    /// Creation time
    pub created_at: String,
}

impl SessionInfo {
    /// Whether the last run left cells to retry
    pub fn has_failures(&self) -> bool {
        self.failed_cells > 0
    }

    /// One line description for logs
    pub fn describe(&self) -> String {
        format!(
            "{} ({} rows, {} columns, {} failed cells, {} runs)",
            self.file_name,
            self.rows,
            self.fields.len(),
            self.failed_cells,
            self.runs
        )
    }
}
