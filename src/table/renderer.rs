//! Table Renderer
//! Rebuilds a page table from records and a column list. Every call is a
//! full rebuild; nothing from a previous render survives.

use crate::data::Record;
use crate::page::{Page, PageError, TableElement};
use crate::table::ColumnSpec;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("Column list is empty")]
    NoColumns,
}

/// Build header and body cells without touching the page.
pub fn build_table(records: &[Record], columns: &[ColumnSpec]) -> TableElement {
    let mut table = TableElement::new();
    table.push_header_row(columns.iter().map(ColumnSpec::header).collect());
    for record in records {
        table.push_row(
            columns
                .iter()
                .map(|col| col.format.apply(record.get(&col.field)))
                .collect(),
        );
    }
    table
}

/// Replace the contents of table `table_id` with `records` shown through `columns`.
///
/// On error the target table is left untouched.
pub fn render_table(
    page: &mut Page,
    table_id: &str,
    records: &[Record],
    columns: &[ColumnSpec],
) -> Result<(), TableError> {
    if columns.is_empty() {
        return Err(TableError::NoColumns);
    }

    let target = page.table_mut(table_id)?;
    *target = build_table(records, columns);

    log::debug!(
        "table.render id={} columns={} rows={}",
        table_id,
        columns.len(),
        records.len()
    );
    Ok(())
}
