//! Per-cell interaction state: selected/editing modes, keystroke routing,
//! the single-slot undo buffer and type-to-overwrite on first keystroke.

mod core;
pub mod keys;

pub use core::{CellCommand, CellContext, CellMachine, CellMode, EventFlow, UndoSlot};
pub use keys::{CellKey, classify_key};
