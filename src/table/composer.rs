use std::sync::Arc;

use crate::geometry::CellLayout;
use crate::navigation::MoveDirection;
use crate::registry::{Activation, RegisterOutcome, RegisteredCell, SharedRegistry};

/// Hands out per-cell scopes over one shared registry.
#[derive(Clone)]
pub struct GridComposer {
    registry: SharedRegistry,
}

impl GridComposer {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn scope(&self, row: usize, column: usize) -> CellScope {
        CellScope {
            registry: Arc::clone(&self.registry),
            row,
            column,
        }
    }
}

/// Registry access for the widget at `(row, column)`. Every layout passed in
/// is local to the unit square and gets offset before it reaches the registry.
#[derive(Clone)]
pub struct CellScope {
    registry: SharedRegistry,
    row: usize,
    column: usize,
}

impl CellScope {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn absolute(&self, local: &CellLayout) -> CellLayout {
        local.offset(self.row, self.column)
    }

    pub fn register<F>(&self, local: &CellLayout, activate: F) -> RegisterOutcome
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.registry
            .register(RegisteredCell::new(self.absolute(local), activate))
    }

    pub fn register_activation(&self, local: &CellLayout, activate: Activation) -> RegisterOutcome {
        self.registry
            .register(RegisteredCell::from_activation(self.absolute(local), activate))
    }

    pub fn unregister(&self, local: &CellLayout) -> bool {
        self.registry.unregister(&self.absolute(local))
    }

    pub fn report_focus(&self, local: &CellLayout) -> bool {
        self.registry.focus(&self.absolute(local))
    }

    /// Move from the registry's current cell; see [`FocusRegistry::navigate`](crate::registry::FocusRegistry::navigate).
    pub fn navigate(&self, direction: MoveDirection) -> Option<CellLayout> {
        self.registry.navigate(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{SplitDirection, split};
    use crate::registry::FocusRegistry;

    #[test]
    fn scopes_offset_local_layouts() {
        let composer = GridComposer::new(Arc::new(FocusRegistry::new()));
        let scope = composer.scope(2, 3);
        let halves = split(SplitDirection::Horizontal, 2).unwrap();
        for half in &halves {
            scope.register(half, || {});
        }
        assert_eq!(
            composer.registry().layouts(),
            vec![
                CellLayout::new(2.0, 3.0, 3.0, 3.5),
                CellLayout::new(2.0, 3.5, 3.0, 4.0),
            ]
        );

        assert!(scope.report_focus(&halves[0]));
        assert_eq!(scope.navigate(MoveDirection::Right), Some(scope.absolute(&halves[1])));
        assert!(scope.unregister(&halves[1]));
        assert_eq!(composer.registry().len(), 1);
    }

    #[test]
    fn neighbouring_scopes_are_adjacent() {
        let composer = GridComposer::new(Arc::new(FocusRegistry::new()));
        let top = composer.scope(0, 0);
        let below = composer.scope(1, 0);
        top.register(&CellLayout::STANDARD, || {});
        below.register(&CellLayout::STANDARD, || {});
        top.report_focus(&CellLayout::STANDARD);
        assert_eq!(top.navigate(MoveDirection::Down), Some(CellLayout::unit(1, 0)));
        assert!(!below.report_focus(&CellLayout::new(0.0, 0.0, 0.5, 1.0)));
    }
}
