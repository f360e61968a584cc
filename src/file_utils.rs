use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use log::{debug, warn};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TableError;
use crate::table::Table;

// @module: File and table I/O utilities

/// Sheet name used when writing translated workbooks
pub const OUTPUT_SHEET_NAME: &str = "Translations";

/// Sheet name used for the example workbook
pub const TEMPLATE_SHEET_NAME: &str = "Example";

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated values
    Csv,
    /// Excel workbook (first sheet is read, one sheet is written)
    Xlsx,
}

impl TableFormat {
    /// Pick the format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Xlsx),
            _ => Err(TableError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated table
    // @params: input_file, output_dir, prefix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        prefix: &str,
    ) -> PathBuf {
        let file_name = input_file
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "table.csv".to_string());

        output_dir.as_ref().join(format!("{}{}", prefix, file_name))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load a table from a CSV file or the first sheet of a workbook
    pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table, TableError> {
        let path = path.as_ref();
        let table = match TableFormat::from_path(path)? {
            TableFormat::Csv => Self::read_csv(path)?,
            TableFormat::Xlsx => Self::read_workbook(path)?,
        };
        debug!(
            "Loaded {} rows and {} columns from {:?}",
            table.row_count(),
            table.fields().len(),
            path
        );
        Ok(table)
    }

    /// Write a table, choosing CSV or XLSX from the path's extension
    pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        match format {
            TableFormat::Csv => Self::write_csv(table, path),
            TableFormat::Xlsx => Self::write_xlsx(table, path, OUTPUT_SHEET_NAME),
        }
    }

    /// Write the example workbook users can start from
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let table = Self::template_table();
        match TableFormat::from_path(path)? {
            TableFormat::Csv => Self::write_csv(&table, path),
            TableFormat::Xlsx => Self::write_xlsx(&table, path, TEMPLATE_SHEET_NAME),
        }
    }

    /// Sample data shipped as the example workbook
    pub fn template_table() -> Table {
        let mut table = Table::new(["es", "en"]);
        table.push_row(["Hola mundo", "Hello world"]);
        table.push_row(["La programación es divertida.", "Programming is fun."]);
        table.push_row(["Una nueva oportunidad laboral.", "A new job opportunity."]);
        table.push_row(["Este es un gran producto.", "This is a great product."]);
        table
    }

    /// Make header names usable as unique field names.
    ///
    /// Blank names become `column_<n>` (1-based position) and repeated names
    /// get a `_<n>` suffix.
    pub fn normalize_headers<I, S>(headers: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result: Vec<String> = Vec::new();
        for (position, header) in headers.into_iter().enumerate() {
            let trimmed = header.as_ref().trim();
            let base = if trimmed.is_empty() {
                format!("column_{}", position + 1)
            } else {
                trimmed.to_string()
            };

            let mut candidate = base.clone();
            let mut suffix = 2;
            while result.contains(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            result.push(candidate);
        }
        result
    }

    fn read_csv(path: &Path) -> Result<Table, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(TableError::MissingHeader(path.display().to_string()));
        }

        let mut table = Table::new(Self::normalize_headers(headers.iter()));
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > table.fields().len() {
                warn!(
                    "Row {} of {:?} has {} values for {} columns, adding unnamed columns",
                    row + 1,
                    path,
                    record.len(),
                    table.fields().len()
                );
                Self::widen_fields(&mut table, record.len());
            }
            table.push_row(record.iter());
        }
        Ok(table)
    }

    /// Add `column_<n>` fields until the table has `width` fields
    fn widen_fields(table: &mut Table, width: usize) {
        while table.fields().len() < width {
            let position = table.fields().len() + 1;
            let base = format!("column_{}", position);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while table.has_field(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            table.add_field(candidate);
        }
    }

    fn read_workbook(path: &Path) -> Result<Table, TableError> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TableError::NoWorksheet(path.display().to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| TableError::MissingHeader(path.display().to_string()))?;

        let mut table = Table::new(Self::normalize_headers(header.iter().map(cell_to_text)));
        for row in rows {
            table.push_row(row.iter().map(cell_to_text));
        }
        Ok(table)
    }

    fn write_csv(table: &Table, path: &Path) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(table.fields())?;
        for row in table.iter_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_xlsx(table: &Table, path: &Path, sheet_name: &str) -> Result<(), TableError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        let column_count = table.fields().len();
        if u16::try_from(column_count).is_err() {
            return Err(TableError::TooManyColumns(column_count));
        }

        for (col, field) in table.fields().iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| TableError::TooManyColumns(column_count))?;
            worksheet.write_string_with_format(0, col, field, &header_format)?;
        }

        for (row_index, row) in table.iter_rows().enumerate() {
            let xlsx_row = (row_index + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                let col = u16::try_from(col).map_err(|_| TableError::TooManyColumns(column_count))?;
                if value.is_empty() {
                    continue;
                }
                match numeric_cell_value(value) {
                    Some(number) => worksheet.write_number(xlsx_row, col, number)?,
                    None => worksheet.write_string(xlsx_row, col, *value)?,
                };
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Stringify a workbook cell; numbers and dates are offered to translation as text
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| datetime.to_string())
            .unwrap_or_else(|| value.as_f64().to_string()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Error(error) => error.to_string(),
    }
}

/// Number a cell held before it was stringified.
///
/// Only text that reads back identically is treated as a number, so values
/// such as `007` or `1e3` stay text.
fn numeric_cell_value(value: &str) -> Option<f64> {
    let number: f64 = value.parse().ok()?;
    if number.is_finite() && number.to_string() == value {
        Some(number)
    } else {
        None
    }
}
