//! Spreadsheet-style cell grid core.
//!
//! Cells occupy fractional rectangles that may be split or merged freely. A
//! shared [`FocusRegistry`] resolves which rectangle sits next to the focused
//! one in any direction, and each widget runs a [`CellMachine`] that handles
//! selected/editing modes, type-to-overwrite and a single-slot undo.

pub mod cell;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod navigation;
pub mod registry;
pub mod table;
pub mod widgets;

pub use cell::{
    CellCommand, CellContext, CellKey, CellMachine, CellMode, EventFlow, UndoSlot, classify_key,
};
pub use error::{GridError, Result};
pub use geometry::{CellLayout, EPSILON};
pub use layout::{SplitDirection, grid, split};
pub use logging::{LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult};
pub use metrics::{GridMetrics, MetricSnapshot};
pub use navigation::{MoveDirection, find_adjacent, move_from};
pub use registry::{Activation, FocusRegistry, RegisterOutcome, RegisteredCell, SharedRegistry};
pub use table::{
    CellAddress, CellScope, ChangeSink, ColumnDef, GridChange, GridComposer, GridConfig, GridEvent,
    GridTable, RowData, TableOutcome,
};
pub use widgets::{
    ButtonCell, CellValue, CheckboxCell, CompoundCell, CompoundPart, DateCell, GridCell,
    NumberCell, SelectCell, SelectOption, TextCell,
};
