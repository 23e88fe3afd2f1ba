//! Merge engine: combine normalized tables into one deduplicated table

use crate::error::{Error, Result};
use crate::schema;
use crate::table::{CellValue, Column, Table};

/// Merge normalized tables, each paired with its source file name
///
/// Every table is tagged with a constant `source_file` column, the tagged
/// tables are concatenated in input order, rows identical across all columns
/// (including the tag) are collapsed to their first occurrence, and every
/// missing-value marker is replaced with an empty string. The result carries
/// the canonical columns followed by `source_file`.
///
/// Each input must already hold the full canonical column set (the schema
/// normalizer's output); a table missing a column fails the whole merge with
/// [`Error::SchemaMismatch`]. An empty input set yields [`Error::NoData`].
pub fn merge(tables: Vec<(Table, String)>) -> Result<Table> {
    if tables.is_empty() {
        return Err(Error::NoData);
    }

    let mut merged = Table::with_columns(&schema::output_columns());

    for (mut table, source_name) in tables {
        let row_count = table.row_count();
        table.push_column(Column::filled(
            schema::SOURCE_COLUMN,
            CellValue::text(source_name.clone()),
            row_count,
        ));

        // Stable concatenation: table order and per-table row order preserved
        for merged_column in &mut merged.columns {
            let position = table
                .columns
                .iter()
                .position(|c| c.name == merged_column.name)
                .ok_or_else(|| Error::SchemaMismatch {
                    column: merged_column.name.clone(),
                    source_name: source_name.clone(),
                })?;
            merged_column.cells.extend(table.columns.remove(position).cells);
        }
    }

    merged.dedup_rows();
    merged.fill_missing();

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::reader::read_csv_str;
    use crate::schema::{CANONICAL_COLUMNS, SOURCE_COLUMN};

    fn normalized(csv: &str, name: &str) -> (Table, String) {
        let table = read_csv_str(csv, name).unwrap();
        (normalize(table), name.to_string())
    }

    fn column_text(table: &Table, name: &str) -> Vec<String> {
        table
            .find_column(name)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(matches!(merge(Vec::new()), Err(Error::NoData)));
    }

    #[test]
    fn test_source_tag_appended_last() {
        let merged = merge(vec![normalized("אזור\nצפון\n", "a.csv")]).unwrap();
        let mut expected: Vec<&str> = CANONICAL_COLUMNS.to_vec();
        expected.push(SOURCE_COLUMN);
        assert_eq!(merged.column_names(), expected);
        assert_eq!(column_text(&merged, SOURCE_COLUMN), vec!["a.csv"]);
    }

    #[test]
    fn test_concatenation_preserves_input_order() {
        let merged = merge(vec![
            normalized("אזור\nצפון\nמרכז\n", "a.csv"),
            normalized("אזור\nדרום\n", "b.csv"),
        ])
        .unwrap();
        assert_eq!(column_text(&merged, "אזור"), vec!["צפון", "מרכז", "דרום"]);
        assert_eq!(
            column_text(&merged, SOURCE_COLUMN),
            vec!["a.csv", "a.csv", "b.csv"]
        );
    }

    #[test]
    fn test_identical_rows_same_source_collapse() {
        let merged = merge(vec![normalized("אזור,רחוב\nצפון,הרצל\nצפון,הרצל\n", "a.csv")]).unwrap();
        assert_eq!(merged.row_count(), 1);
    }

    #[test]
    fn test_identical_rows_different_source_both_kept() {
        let merged = merge(vec![
            normalized("אזור,רחוב\nצפון,הרצל\n", "a.csv"),
            normalized("אזור,רחוב\nצפון,הרצל\n", "b.csv"),
        ])
        .unwrap();
        assert_eq!(merged.row_count(), 2);
        assert_eq!(column_text(&merged, SOURCE_COLUMN), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_same_file_resubmitted_collapses() {
        let merged = merge(vec![
            normalized("אזור\nצפון\n", "a.csv"),
            normalized("אזור\nצפון\n", "a.csv"),
        ])
        .unwrap();
        assert_eq!(merged.row_count(), 1);
    }

    #[test]
    fn test_no_missing_markers_in_output() {
        let merged = merge(vec![normalized("אזור\nצפון\n", "a.csv")]).unwrap();
        assert!(merged
            .columns
            .iter()
            .all(|c| c.cells.iter().all(|cell| !cell.is_missing())));
    }

    #[test]
    fn test_two_files_with_different_columns() {
        let merged = merge(vec![
            normalized("אזור,מספר עצים\nצפון,3\n", "A"),
            normalized("אזור,מספר\nדרום,7\n", "B"),
        ])
        .unwrap();

        assert_eq!(merged.row_count(), 2);
        assert_eq!(column_text(&merged, "אזור"), vec!["צפון", "דרום"]);
        assert_eq!(column_text(&merged, "מספר_עצים"), vec!["3", ""]);
        assert_eq!(column_text(&merged, "מספר"), vec!["", "7"]);
        assert_eq!(column_text(&merged, SOURCE_COLUMN), vec!["A", "B"]);
    }

    #[test]
    fn test_unnormalized_table_is_schema_mismatch() {
        let table = read_csv_str("אזור\nצפון\n", "raw.csv").unwrap();
        let result = merge(vec![(table, "raw.csv".to_string())]);
        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }

    #[test]
    fn test_row_count_bounded_by_input_sum() {
        let merged = merge(vec![
            normalized("אזור\nצפון\nצפון\nדרום\n", "a.csv"),
            normalized("אזור\nדרום\n", "b.csv"),
        ])
        .unwrap();
        assert!(merged.row_count() <= 4);
        assert_eq!(merged.row_count(), 3);
    }
}
