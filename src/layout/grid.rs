//! Integer track placement for fractional layouts.
//!
//! Hosts that draw sub-cells on a fixed track grid (CSS-grid style) need whole
//! track indices instead of fractions. A cell is divided into `divisions`
//! tracks per axis and every fractional bound is rounded onto that grid:
//! - spans are never smaller than one track
//! - [`infer_structure`] reports how many tracks a set of layouts occupies
//!
//! # Example
//! ```
//! use cellgrid::layout::{SplitDirection, split, to_position};
//!
//! let thirds = split(SplitDirection::Vertical, 3)?;
//! let middle = to_position(&thirds[1], 12)?;
//! assert_eq!((middle.row_start, middle.row_span), (4, 4));
//! # Ok::<(), cellgrid::GridError>(())
//! ```

use crate::error::{GridError, Result};
use crate::geometry::CellLayout;

/// Default number of tracks per cell axis.
pub const DEFAULT_DIVISIONS: u16 = 12;

/// Placement of a layout on the integer track grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row_start: u16,
    pub column_start: u16,
    pub row_span: u16,
    pub column_span: u16,
}

impl CellPosition {
    pub fn row_end(&self) -> u16 {
        self.row_start.saturating_add(self.row_span)
    }

    pub fn column_end(&self) -> u16 {
        self.column_start.saturating_add(self.column_span)
    }
}

/// Track counts needed to hold a set of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStructure {
    pub rows: u16,
    pub columns: u16,
}

impl Default for GridStructure {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
        }
    }
}

fn to_track(value: f64, divisions: u16) -> u16 {
    let scaled = (value * divisions as f64).round();
    scaled.clamp(0.0, u16::MAX as f64) as u16
}

/// Round a fractional layout onto a `divisions`-track grid.
pub fn to_position(layout: &CellLayout, divisions: u16) -> Result<CellPosition> {
    if divisions == 0 {
        return Err(GridError::InvalidDivisions);
    }

    let row_start = to_track(layout.top_row, divisions);
    let column_start = to_track(layout.left_column, divisions);
    let row_end = to_track(layout.bottom_row, divisions);
    let column_end = to_track(layout.right_column, divisions);

    Ok(CellPosition {
        row_start,
        column_start,
        row_span: row_end.saturating_sub(row_start).max(1),
        column_span: column_end.saturating_sub(column_start).max(1),
    })
}

/// Smallest track structure containing every layout. An empty set maps to 1x1.
pub fn infer_structure(layouts: &[CellLayout], divisions: u16) -> Result<GridStructure> {
    if divisions == 0 {
        return Err(GridError::InvalidDivisions);
    }
    if layouts.is_empty() {
        return Ok(GridStructure::default());
    }

    let mut structure = GridStructure::default();
    for layout in layouts {
        let position = to_position(layout, divisions)?;
        structure.rows = structure.rows.max(position.row_end());
        structure.columns = structure.columns.max(position.column_end());
    }
    Ok(structure)
}
