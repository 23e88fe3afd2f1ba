//! Decoders turning input files into tables
//!
//! Delimited text goes through the csv crate (UTF-8 with a windows-1252
//! fallback); everything else is opened as a spreadsheet workbook, reading
//! the first sheet only. The first record of either format is the header
//! row.

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Table};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader};
use chrono::{Datelike, Timelike};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// File extensions the reader can decode, lowercase
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "csv"];

/// Check whether a path has a supported extension (case-insensitive)
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode one input file into a Table
pub fn read_table(path: &Path) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        let bytes = std::fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        decode_csv(&bytes, path)
    } else {
        read_workbook(path)
    }
}

/// Decode in-memory file content, dispatching on the name's extension
///
/// Entry point for callers that hold file content rather than a path, e.g.
/// a front end receiving uploads.
pub fn read_table_bytes(bytes: &[u8], source_name: &str) -> Result<Table> {
    let path = PathBuf::from(source_name);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if extension == "csv" {
        decode_csv(bytes, &path)
    } else {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| Error::Spreadsheet {
                path: path.clone(),
                source: e,
            })?;
        sheets_to_table(&mut workbook, &path)
    }
}

/// Decode delimited-text bytes into a Table
pub fn read_csv_bytes(bytes: &[u8], source_name: &str) -> Result<Table> {
    decode_csv(bytes, &PathBuf::from(source_name))
}

/// Decode a CSV string into a Table (useful for testing)
pub fn read_csv_str(content: &str, source_name: &str) -> Result<Table> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    parse_csv_text(content, &PathBuf::from(source_name))
}

fn decode_csv(bytes: &[u8], path: &Path) -> Result<Table> {
    // UTF-8 first; legacy municipal exports arrive in windows-1252
    let text: Cow<'_, str> = match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0,
    };
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    parse_csv_text(text, path)
}

fn parse_csv_text(text: &str, path: &Path) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(text.as_bytes());

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    if headers.is_empty() {
        return Err(Error::CsvDecode {
            path: path.to_path_buf(),
            message: "no header row found".to_string(),
        });
    }

    let names: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for (row_index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        if record.len() > names.len() {
            eprintln!(
                "Warning: row {} in {} has more fields than headers, truncating",
                row_index + 1,
                path.display()
            );
        }

        // Short rows are padded with missing-value markers
        for (column_index, column) in cells.iter_mut().enumerate() {
            match record.get(column_index) {
                Some(field) => column.push(CellValue::from_field(field)),
                None => column.push(CellValue::Missing),
            }
        }
    }

    Ok(Table {
        columns: names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    })
}

fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::Spreadsheet {
        path: path.to_path_buf(),
        source: e,
    })?;
    sheets_to_table(&mut workbook, path)
}

fn sheets_to_table<RS: std::io::Read + std::io::Seek>(
    workbook: &mut calamine::Sheets<RS>,
    path: &Path,
) -> Result<Table> {
    // First sheet only; later sheets of multi-sheet workbooks are ignored
    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names.first().ok_or_else(|| Error::Spreadsheet {
        path: path.to_path_buf(),
        source: calamine::Error::Msg("workbook has no sheets"),
    })?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| Error::Spreadsheet {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut rows = range.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => return Ok(Table::new()),
    };

    let names: Vec<String> = header_row.iter().map(render_cell).collect();
    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (column_index, column) in cells.iter_mut().enumerate() {
            match row.get(column_index) {
                Some(cell) => column.push(decode_cell(cell)),
                None => column.push(CellValue::Missing),
            }
        }
    }

    Ok(Table {
        columns: names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    })
}

fn decode_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        other => CellValue::from_field(&render_cell(other)),
    }
}

/// Render a workbook cell as text
///
/// Whole-number floats display as integers (e.g. `3.0` becomes `"3"`),
/// booleans as `TRUE` / `FALSE`, date-time cells as `YYYY-MM-DD` or
/// `YYYY-MM-DD HH:MM:SS`, error cells as their display text (`#DIV/0!`).
/// Formula cells arrive as their computed values.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => {
            if let Some(ndt) = dt.as_datetime() {
                let (h, m, s) = (ndt.hour(), ndt.minute(), ndt.second());
                if h == 0 && m == 0 && s == 0 {
                    format!("{:04}-{:02}-{:02}", ndt.year(), ndt.month(), ndt.day())
                } else {
                    format!(
                        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                        ndt.year(),
                        ndt.month(),
                        ndt.day(),
                        h,
                        m,
                        s
                    )
                }
            } else {
                format!("{dt}")
            }
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e}"),
    }
}
