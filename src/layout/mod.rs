//! Layout module orchestrator.
//!
//! Sub-cell rectangle generation lives in the private `core` module; `grid`
//! maps fractional layouts onto integer tracks for hosts that place sub-cells
//! on a fixed track grid.

mod core;
pub mod grid;

pub use core::{SplitDirection, grid, split};
pub use grid::{CellPosition, DEFAULT_DIVISIONS, GridStructure, infer_structure, to_position};
