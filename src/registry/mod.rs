mod core;

pub use core::{Activation, FocusRegistry, RegisterOutcome, RegisteredCell, SharedRegistry};
