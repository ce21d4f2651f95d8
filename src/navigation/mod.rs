//! Directional adjacency over irregular rectangle tilings.

mod core;

pub use core::{MoveDirection, find_adjacent, move_from};
