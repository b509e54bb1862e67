//! Table module - generic record-to-table rendering

mod columns;
mod format;
mod renderer;

pub use columns::{columns, header_label, ColumnSpec};
pub use format::{group_thousands, CellFormat};
pub use renderer::{build_table, render_table, TableError};
