//! permit-core: Core library for normalizing and merging tree-permit tables
//!
//! This library provides functionality to:
//! - Scan directories for supported tabular files (spreadsheets and CSV)
//! - Decode each file into a generic column-oriented table
//! - Conform every table to the fixed canonical permit-record schema
//! - Merge the normalized tables into one deduplicated, source-tagged table
//! - Serialize the merged table as a spreadsheet workbook and as CSV

pub mod error;
pub mod merge;
pub mod normalize;
pub mod reader;
pub mod scanner;
pub mod schema;
pub mod table;
pub mod writer;

pub use error::{Error, Result};
pub use merge::merge;
pub use normalize::normalize;
pub use reader::{
    is_supported, read_csv_bytes, read_csv_str, read_table, read_table_bytes, SUPPORTED_EXTENSIONS,
};
pub use scanner::scan_input_dir;
pub use schema::{output_columns, CANONICAL_COLUMNS, HEADER_ALIASES, SOURCE_COLUMN};
pub use table::{CellValue, Column, Table};
pub use writer::{write_csv, write_csv_file, write_xlsx, write_xlsx_file};
