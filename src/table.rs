use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

// @module: In-memory table store

/// Prefix written in front of the last error when a cell could not be translated
pub const FAILURE_MARKER_PREFIX: &str = "ERROR_TRANSLATION_FAILED:";

// @const: Recognized failure markers.
// Covers the marker written by this crate as well as `ERROR: ...` and
// `ERROR_<WORDS>` markers found in previously processed workbooks.
static FAILURE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ERROR(?:_[A-Z_]+)?(?::|$)").expect("failure marker pattern is valid")
});

/// Check whether a cell value is a recorded translation failure
pub fn is_failure_marker(value: &str) -> bool {
    FAILURE_MARKER_REGEX.is_match(value.trim_start())
}

/// Build the marker stored in a cell after the retry budget ran out
pub fn failure_marker(error: &str) -> String {
    format!("{} {}", FAILURE_MARKER_PREFIX, error)
}

/// Translation state of one target cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Absent or empty, never translated
    Empty,
    /// Holds a failure marker, eligible for another attempt
    Failed,
    /// Holds translated text, never overwritten
    Succeeded,
}

impl CellState {
    /// Classify a raw cell value
    pub fn of(value: Option<&str>) -> Self {
        match value {
            None => Self::Empty,
            Some(v) if v.is_empty() => Self::Empty,
            Some(v) if is_failure_marker(v) => Self::Failed,
            Some(_) => Self::Succeeded,
        }
    }

    /// Whether the pipeline should (re)translate a cell in this state
    pub fn needs_translation(self) -> bool {
        matches!(self, Self::Empty | Self::Failed)
    }
}

/// Tabular dataset: ordered unique field names and ordered rows.
///
/// Rows are stored column-aligned; a `None` slot is a field the row has no
/// value for, which reads as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    fields: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table with the given header.
    ///
    /// Duplicate names keep their first position; later copies are dropped.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for field in fields {
            table.add_field(field);
        }
        table
    }

    /// Field names in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a field in the header
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }

    /// Whether a field exists
    pub fn has_field(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Add a field at the end of the header, returning its position.
    ///
    /// Existing rows get an absent value. Adding a field that already exists
    /// is a no-op that returns the existing position.
    pub fn add_field(&mut self, field: impl Into<String>) -> usize {
        let field = field.into();
        if let Some(position) = self.index.get(&field) {
            return *position;
        }

        let position = self.fields.len();
        self.index.insert(field.clone(), position);
        self.fields.push(field);
        for row in &mut self.rows {
            row.push(None);
        }
        position
    }

    /// Append a row given as values in header order.
    ///
    /// Short rows are padded with absent values and extra values are ignored.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<Option<String>> = values
            .into_iter()
            .take(self.fields.len())
            .map(|value| Some(value.into()))
            .collect();
        row.resize(self.fields.len(), None);
        self.rows.push(row);
    }

    /// Read a cell; `None` when the field is unknown or the row has no entry.
    ///
    /// # Panics
    /// Panics if `row` is out of range.
    pub fn get_cell(&self, row: usize, field: &str) -> Option<&str> {
        let position = self.field_index(field)?;
        self.rows[row][position].as_deref()
    }

    /// Write a cell, creating the field across all rows when missing.
    ///
    /// # Panics
    /// Panics if `row` is out of range.
    pub fn set_cell(&mut self, row: usize, field: &str, value: impl Into<String>) {
        assert!(
            row < self.rows.len(),
            "row index {} out of range for table with {} rows",
            row,
            self.rows.len()
        );
        let position = self.add_field(field);
        self.rows[row][position] = Some(value.into());
    }

    /// Translation state of a target cell
    pub fn cell_state(&self, row: usize, field: &str) -> CellState {
        CellState::of(self.get_cell(row, field))
    }

    /// Rows whose source cell has text and whose target cell is empty or failed.
    ///
    /// Returned in ascending row order. A missing target field means every
    /// row with source text qualifies; a missing source field yields nothing.
    pub fn rows_needing_translation(&self, source_field: &str, target_field: &str) -> Vec<usize> {
        if !self.has_field(source_field) {
            return Vec::new();
        }

        (0..self.rows.len())
            .filter(|&row| {
                let has_source = self
                    .get_cell(row, source_field)
                    .is_some_and(|text| !text.trim().is_empty());
                has_source && self.cell_state(row, target_field).needs_translation()
            })
            .collect()
    }

    /// Rows of a field currently holding a failure marker, with the marker text
    pub fn failed_cells(&self, field: &str) -> Vec<(usize, &str)> {
        (0..self.rows.len())
            .filter_map(|row| {
                self.get_cell(row, field)
                    .filter(|value| is_failure_marker(value))
                    .map(|value| (row, value))
            })
            .collect()
    }

    /// Values of one row in header order, absent cells as empty strings
    pub fn row_values(&self, row: usize) -> Vec<&str> {
        self.rows[row]
            .iter()
            .map(|value| value.as_deref().unwrap_or(""))
            .collect()
    }

    /// Iterate over all rows in header order
    pub fn iter_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.rows.len()).map(move |row| self.row_values(row))
    }

    /// A copy holding the header and at most `limit` leading rows
    pub fn preview(&self, limit: usize) -> Table {
        Table {
            fields: self.fields.clone(),
            index: self.index.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.fields.join(" | "))?;
        for row in self.iter_rows() {
            writeln!(f, "{}", row.join(" | "))?;
        }
        Ok(())
    }
}
