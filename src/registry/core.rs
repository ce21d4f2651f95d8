use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::json;

use crate::geometry::{CellLayout, EPSILON};
use crate::logging::{LogLevel, Logger, emit, json_kv};
use crate::navigation::{MoveDirection, find_adjacent};

const LOG_TARGET: &str = "cellgrid::registry";

/// Side effect that moves UI focus onto a registered cell.
pub type Activation = Arc<dyn Fn() + Send + Sync>;

/// A focusable rectangle together with its activation callback.
#[derive(Clone)]
pub struct RegisteredCell {
    layout: CellLayout,
    activate: Activation,
}

impl RegisteredCell {
    pub fn new<F>(layout: CellLayout, activate: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            layout,
            activate: Arc::new(activate),
        }
    }

    pub fn from_activation(layout: CellLayout, activate: Activation) -> Self {
        Self { layout, activate }
    }

    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }

    pub fn activate(&self) {
        (self.activate)();
    }
}

impl fmt::Debug for RegisteredCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCell")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new rectangle joined the registry.
    Added,
    /// An existing rectangle had its activation replaced.
    Replaced,
}

#[derive(Default)]
struct RegistryState {
    cells: Vec<RegisteredCell>,
    current: Option<CellLayout>,
}

impl RegistryState {
    fn position(&self, layout: &CellLayout, epsilon: f64) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.layout.approx_eq(layout, epsilon))
    }

    fn current_cell(&self, epsilon: f64) -> Option<&RegisteredCell> {
        let current = self.current?;
        self.position(&current, epsilon).map(|idx| &self.cells[idx])
    }
}

/// Shared collection of focusable cells plus the "currently focused" pointer.
///
/// The pointer is stored as bounds and resolved against the live registrations
/// on every read, so a registry rebuilt through [`clear`](Self::clear) and
/// re-registration keeps pointing at the same logical cell.
pub struct FocusRegistry {
    inner: RwLock<RegistryState>,
    epsilon: f64,
    logger: Option<Logger>,
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryState::default()),
            epsilon: EPSILON,
            logger: None,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Add a cell, or replace the activation of the cell with the same bounds.
    pub fn register(&self, cell: RegisteredCell) -> RegisterOutcome {
        let layout = cell.layout;
        let outcome = match self.inner.write() {
            Ok(mut guard) => match guard.position(&layout, self.epsilon) {
                Some(idx) => {
                    guard.cells[idx].activate = cell.activate;
                    RegisterOutcome::Replaced
                }
                None => {
                    guard.cells.push(cell);
                    RegisterOutcome::Added
                }
            },
            Err(_) => return RegisterOutcome::Replaced,
        };

        if outcome == RegisterOutcome::Added {
            self.log(
                LogLevel::Debug,
                "cell_registered",
                [json_kv("layout", json!(layout))],
            );
        }
        outcome
    }

    /// Remove the cell with these bounds. Clears the pointer if it referred to it.
    pub fn unregister(&self, layout: &CellLayout) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let Some(idx) = guard.position(layout, self.epsilon) else {
            return false;
        };
        guard.cells.remove(idx);
        if guard
            .current
            .is_some_and(|current| current.approx_eq(layout, self.epsilon))
        {
            guard.current = None;
        }
        true
    }

    /// Drop every registration ahead of a full rebuild. The pointer bounds are kept.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.cells.clear();
        }
    }

    /// Point at the registered cell with exactly these bounds.
    ///
    /// A miss leaves the previous pointer untouched and returns `false`.
    pub fn focus(&self, layout: &CellLayout) -> bool {
        let hit = match self.inner.write() {
            Ok(mut guard) => match guard.position(layout, self.epsilon) {
                Some(idx) => {
                    guard.current = Some(guard.cells[idx].layout);
                    true
                }
                None => false,
            },
            Err(_) => false,
        };

        self.log(
            LogLevel::Debug,
            if hit { "focus_reported" } else { "focus_missed" },
            [json_kv("layout", json!(layout))],
        );
        hit
    }

    pub fn current_cell(&self) -> Option<RegisteredCell> {
        let guard = self.inner.read().ok()?;
        guard.current_cell(self.epsilon).cloned()
    }

    pub fn current_layout(&self) -> Option<CellLayout> {
        self.current_cell().map(|cell| cell.layout)
    }

    /// Adjacent cell in `direction`, without touching the pointer.
    pub fn move_from(&self, current: &CellLayout, direction: MoveDirection) -> Option<RegisteredCell> {
        let guard = self.inner.read().ok()?;
        let layouts = guard.cells.iter().map(|cell| &cell.layout);
        find_adjacent(layouts, current, direction, self.epsilon).map(|idx| guard.cells[idx].clone())
    }

    /// Move the pointer from the current cell in `direction` and activate the
    /// target. Returns the target bounds, or `None` when focus stays put.
    ///
    /// The activation runs after the registry lock is released, so it may
    /// report focus back into this registry.
    pub fn navigate(&self, direction: MoveDirection) -> Option<CellLayout> {
        let target = {
            let mut guard = self.inner.write().ok()?;
            let current = guard.current_cell(self.epsilon)?.layout;
            let layouts = guard.cells.iter().map(|cell| &cell.layout);
            let idx = find_adjacent(layouts, &current, direction, self.epsilon);
            match idx {
                Some(idx) => {
                    let target = guard.cells[idx].clone();
                    guard.current = Some(target.layout);
                    Some((current, target))
                }
                None => {
                    drop(guard);
                    self.log(
                        LogLevel::Debug,
                        "move_blocked",
                        [
                            json_kv("direction", json!(direction.as_str())),
                            json_kv("from", json!(current)),
                        ],
                    );
                    None
                }
            }
        };

        let (from, target) = target?;
        self.log(
            LogLevel::Debug,
            "focus_moved",
            [
                json_kv("direction", json!(direction.as_str())),
                json_kv("from", json!(from)),
                json_kv("to", json!(target.layout)),
            ],
        );
        target.activate();
        Some(target.layout)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered bounds in registration order.
    pub fn layouts(&self) -> Vec<CellLayout> {
        self.inner
            .read()
            .map(|guard| guard.cells.iter().map(|cell| cell.layout).collect())
            .unwrap_or_default()
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        emit(self.logger.as_ref(), level, LOG_TARGET, message, fields);
    }
}

pub type SharedRegistry = Arc<FocusRegistry>;
