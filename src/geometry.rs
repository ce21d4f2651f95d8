use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Tolerance used when comparing fractional rectangle edges.
///
/// Thirds and other non-binary fractions never land exactly on each other
/// after offsetting, so edge comparisons go through this instead of `==`.
pub const EPSILON: f64 = 1e-3;

/// Rectangle occupied by a cell in normalized grid coordinates.
///
/// One row unit / column unit corresponds to one logical grid row / column.
/// An unsplit cell at the origin is [`CellLayout::STANDARD`]; split cells use
/// fractional bounds inside `[0, 1]` until the composer offsets them into
/// absolute grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    pub top_row: f64,
    pub left_column: f64,
    pub bottom_row: f64,
    pub right_column: f64,
}

impl CellLayout {
    /// The unit rectangle of a cell that is not subdivided.
    pub const STANDARD: CellLayout = CellLayout::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(top_row: f64, left_column: f64, bottom_row: f64, right_column: f64) -> Self {
        Self {
            top_row,
            left_column,
            bottom_row,
            right_column,
        }
    }

    /// Validating constructor. Bounds must be finite with `top < bottom` and
    /// `left < right`.
    pub fn try_new(
        top_row: f64,
        left_column: f64,
        bottom_row: f64,
        right_column: f64,
    ) -> Result<Self> {
        let layout = Self::new(top_row, left_column, bottom_row, right_column);
        layout.validate()?;
        Ok(layout)
    }

    /// Unit rectangle for the whole cell at `(row, column)`.
    pub fn unit(row: usize, column: usize) -> Self {
        Self::STANDARD.offset(row, column)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [
            self.top_row,
            self.left_column,
            self.bottom_row,
            self.right_column,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(GridError::InvalidLayout(format!(
                "non-finite bounds in {self:?}"
            )));
        }
        if self.top_row >= self.bottom_row {
            return Err(GridError::InvalidLayout(format!(
                "top_row {} must be above bottom_row {}",
                self.top_row, self.bottom_row
            )));
        }
        if self.left_column >= self.right_column {
            return Err(GridError::InvalidLayout(format!(
                "left_column {} must be left of right_column {}",
                self.left_column, self.right_column
            )));
        }
        Ok(())
    }

    /// Shift a local layout into absolute coordinates for the cell at
    /// `(row, column)`.
    pub fn offset(&self, row: usize, column: usize) -> Self {
        let (dr, dc) = (row as f64, column as f64);
        Self {
            top_row: self.top_row + dr,
            left_column: self.left_column + dc,
            bottom_row: self.bottom_row + dr,
            right_column: self.right_column + dc,
        }
    }

    pub fn mid_row(&self) -> f64 {
        (self.top_row + self.bottom_row) / 2.0
    }

    pub fn mid_column(&self) -> f64 {
        (self.left_column + self.right_column) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.bottom_row - self.top_row
    }

    pub fn width(&self) -> f64 {
        self.right_column - self.left_column
    }

    /// All four bounds equal within `epsilon`.
    pub fn approx_eq(&self, other: &CellLayout, epsilon: f64) -> bool {
        (self.top_row - other.top_row).abs() < epsilon
            && (self.left_column - other.left_column).abs() < epsilon
            && (self.bottom_row - other.bottom_row).abs() < epsilon
            && (self.right_column - other.right_column).abs() < epsilon
    }
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}
