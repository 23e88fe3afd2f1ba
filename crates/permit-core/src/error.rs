//! Error types for permit-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in permit-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode delimited text
    #[error("failed to decode CSV '{path}': {message}")]
    CsvDecode { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to open or read a spreadsheet workbook
    #[error("failed to read spreadsheet '{path}': {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// A table handed to the merge engine is missing a canonical column
    #[error("table from '{source_name}' is missing column '{column}'")]
    SchemaMismatch { column: String, source_name: String },

    /// The merge engine received no tables
    #[error("no tables to merge")]
    NoData,

    /// CSV output error
    #[error("failed to write CSV: {0}")]
    CsvWrite(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook archive error
    #[error("failed to write workbook: {0}")]
    Zip(#[from] zip::result::ZipError),
}
