use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the cellgrid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced by layout construction and table configuration.
///
/// Lookup misses (focus reports for unknown rectangles, moves with no
/// adjacent cell) are not errors and never show up here.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("split count must be at least 1 (got {count})")]
    InvalidSplit { count: usize },
    #[error("grid dimensions must be at least 1x1 (got {rows}x{columns})")]
    InvalidGrid { rows: usize, columns: usize },
    #[error("track divisions must be at least 1")]
    InvalidDivisions,
    #[error("invalid cell layout: {0}")]
    InvalidLayout(String),
    #[error("column `{0}` not found")]
    UnknownColumn(String),
    #[error("row {row} out of bounds ({rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },
    #[error("column index {column} out of bounds ({columns} columns)")]
    ColumnOutOfBounds { column: usize, columns: usize },
    #[error("sub-cell {sub} out of bounds ({parts} parts)")]
    SubCellOutOfBounds { sub: usize, parts: usize },
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
}
