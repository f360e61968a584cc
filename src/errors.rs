/*!
 * Error types for the sheetlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider.
///
/// These are transient from the pipeline's point of view: the translation
/// service retries them and never lets them escape past a single cell.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while reading or writing tabular files
#[derive(Error, Debug)]
pub enum TableError {
    /// Underlying IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input or failed CSV write
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or a sheet could not be read
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Workbook could not be written
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The workbook has no sheet to read from
    #[error("Workbook contains no worksheets: {0}")]
    NoWorksheet(String),

    /// The file extension is not a supported table format
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// The file does not contain a header row
    #[error("Missing header row in {0}")]
    MissingHeader(String),

    /// More columns than a worksheet can hold
    #[error("Table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),
}

/// Input validation errors for a pipeline run.
///
/// Both are reported before any translation work starts and leave the
/// table untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    /// The requested source field does not exist in the table
    #[error("Source column '{field}' not found. Available columns: {available}")]
    UnknownSourceField {
        /// Requested field name
        field: String,
        /// Comma separated list of existing fields
        available: String,
    },

    /// No target language was supplied
    #[error("At least one target language is required")]
    NoTargetLanguages,
}
