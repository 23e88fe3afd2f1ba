//! Schema normalizer: conform an arbitrary input table to the canonical columns

use crate::schema;
use crate::table::{CellValue, Column, Table};

/// Normalize a decoded table to exactly the canonical column set and order
///
/// Synthetic index columns left behind by earlier exports are dropped, known
/// header variants are renamed to their canonical spelling, canonical columns
/// absent from the input are backfilled with missing-value markers, and the
/// result is projected to the canonical sequence. Row count, row order, and
/// the content of retained columns are unchanged.
pub fn normalize(table: Table) -> Table {
    let row_count = table.row_count();

    // Drop index leftovers before renaming; their raw labels never alias
    let mut columns: Vec<Column> = table
        .columns
        .into_iter()
        .filter(|c| !schema::is_synthetic_index(&c.name))
        .map(|mut c| {
            c.name = schema::resolve_header(&c.name);
            c
        })
        .collect();

    let mut normalized = Table::new();
    for name in schema::CANONICAL_COLUMNS {
        // First occurrence wins when a rename produced duplicate labels
        match columns.iter().position(|c| c.name == name) {
            Some(index) => normalized.push_column(columns.remove(index)),
            None => normalized.push_column(Column::filled(name, CellValue::Missing, row_count)),
        }
    }

    normalized
}
