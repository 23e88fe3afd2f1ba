//! Core table types for representing tabular permit data

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single cell: text, or a missing-value marker
///
/// `Missing` is produced by normalizer backfill, ragged source rows, and
/// empty decoded cells. It is distinct from `Text("")` until the merge
/// engine's fill step replaces every marker with an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellValue {
    /// Text value
    Text(String),
    /// Missing value, filled to an empty string during merge
    Missing,
}

impl CellValue {
    /// Create a text cell
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Interpret a decoded field: empty fields are missing values
    pub fn from_field(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Check if the cell is a missing-value marker
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// The cell text; missing values read as an empty string
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Missing => "",
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named column and its cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Cell values, one per row
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Create a new column
    pub fn new<S: Into<String>>(name: S, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Create a column of `len` copies of the same value
    pub fn filled<S: Into<String>>(name: S, value: CellValue, len: usize) -> Self {
        Self {
            name: name.into(),
            cells: vec![value; len],
        }
    }

    /// Number of cells in the column
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An ordered mapping from column name to column data
///
/// Invariant: every column holds the same number of cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Columns in display order
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given column names and no rows
    pub fn with_columns(names: &[&str]) -> Self {
        Self {
            columns: names
                .iter()
                .map(|name| Column::new(*name, Vec::new()))
                .collect(),
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Append a column
    pub fn push_column(&mut self, column: Column) {
        debug_assert!(
            self.columns.is_empty() || column.len() == self.row_count(),
            "column '{}' length {} does not match row count {}",
            column.name,
            column.len(),
            self.row_count()
        );
        self.columns.push(column);
    }

    /// The cells of one row, across all columns in order
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// The cell text of one row; missing values read as empty strings
    pub fn row_text(&self, index: usize) -> Vec<&str> {
        self.columns.iter().map(|c| c.cells[index].as_str()).collect()
    }

    /// Remove rows that are fully identical across all columns
    ///
    /// The first occurrence in row order is kept.
    pub fn dedup_rows(&mut self) {
        let mut seen: HashSet<Vec<CellValue>> = HashSet::new();
        let keep: Vec<bool> = (0..self.row_count())
            .map(|i| {
                let key: Vec<CellValue> =
                    self.columns.iter().map(|c| c.cells[i].clone()).collect();
                seen.insert(key)
            })
            .collect();

        for column in &mut self.columns {
            let mut flags = keep.iter().copied();
            column.cells.retain(|_| flags.next().unwrap_or(false));
        }
    }

    /// Replace every missing-value marker with an empty string
    pub fn fill_missing(&mut self) {
        for column in &mut self.columns {
            for cell in &mut column.cells {
                if cell.is_missing() {
                    *cell = CellValue::Text(String::new());
                }
            }
        }
    }
}
