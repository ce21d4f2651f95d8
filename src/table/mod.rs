//! Table orchestration: the grid composer that maps `(row, column)` widgets
//! onto registry coordinates, the host-side change reducer, and `GridTable`
//! which ties widgets, row data and focus together.

mod composer;
mod config;
mod core;
mod reducer;

pub use composer::{CellScope, GridComposer};
pub use config::GridConfig;
pub use core::{CellAddress, CellFactory, ColumnDef, GridEvent, GridTable, TableOutcome};
pub use reducer::{ChangeSink, GridChange, RowData, apply_change};
