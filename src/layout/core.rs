use crate::error::{GridError, Result};
use crate::geometry::CellLayout;

/// Axis along which a cell is subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// Side-by-side parts; each part spans the full height.
    Horizontal,
    /// Stacked parts; each part spans the full width.
    Vertical,
}

/// Split the unit square into `count` equal parts along `direction`,
/// ordered top-to-bottom or left-to-right.
pub fn split(direction: SplitDirection, count: usize) -> Result<Vec<CellLayout>> {
    if count < 1 {
        return Err(GridError::InvalidSplit { count });
    }

    let total = count as f64;
    let layouts = (0..count)
        .map(|idx| {
            let start = idx as f64 / total;
            let end = (idx + 1) as f64 / total;
            match direction {
                SplitDirection::Horizontal => CellLayout::new(0.0, start, 1.0, end),
                SplitDirection::Vertical => CellLayout::new(start, 0.0, end, 1.0),
            }
        })
        .collect();
    Ok(layouts)
}

/// Tile the unit square with `rows * columns` equal parts in row-major order.
pub fn grid(rows: usize, columns: usize) -> Result<Vec<CellLayout>> {
    if rows < 1 || columns < 1 {
        return Err(GridError::InvalidGrid { rows, columns });
    }

    let (row_total, column_total) = (rows as f64, columns as f64);
    let mut layouts = Vec::with_capacity(rows * columns);
    for r in 0..rows {
        for c in 0..columns {
            layouts.push(CellLayout::new(
                r as f64 / row_total,
                c as f64 / column_total,
                (r + 1) as f64 / row_total,
                (c + 1) as f64 / column_total,
            ));
        }
    }
    Ok(layouts)
}
