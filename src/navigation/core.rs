use crate::geometry::CellLayout;

/// Direction of a keyboard move between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Down,
        MoveDirection::Left,
        MoveDirection::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            MoveDirection::Up => MoveDirection::Down,
            MoveDirection::Down => MoveDirection::Up,
            MoveDirection::Left => MoveDirection::Right,
            MoveDirection::Right => MoveDirection::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, MoveDirection::Up | MoveDirection::Down)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        }
    }
}

/// Does `candidate` sit directly across `current`'s edge in `direction`?
///
/// Vertical moves test the current midpoint column against `[left, right)`;
/// horizontal moves test the midpoint row against `(top, bottom]`. The
/// half-open ranges pick exactly one target when the midpoint lands on a
/// boundary shared by two candidates.
fn is_adjacent(
    current: &CellLayout,
    candidate: &CellLayout,
    direction: MoveDirection,
    epsilon: f64,
) -> bool {
    match direction {
        MoveDirection::Up | MoveDirection::Down => {
            let edge_gap = match direction {
                MoveDirection::Up => current.top_row - candidate.bottom_row,
                _ => current.bottom_row - candidate.top_row,
            };
            let mid_column = current.mid_column();
            edge_gap.abs() < epsilon
                && mid_column >= candidate.left_column
                && mid_column < candidate.right_column
        }
        MoveDirection::Left | MoveDirection::Right => {
            let edge_gap = match direction {
                MoveDirection::Left => current.left_column - candidate.right_column,
                _ => current.right_column - candidate.left_column,
            };
            let mid_row = current.mid_row();
            edge_gap.abs() < epsilon && mid_row > candidate.top_row && mid_row <= candidate.bottom_row
        }
    }
}

/// Index of the first candidate adjacent to `current` in `direction`.
///
/// Candidates equal to `current` (within `epsilon`) are skipped. Iteration
/// order is the tie-break: the earliest match wins.
pub fn find_adjacent<'a, I>(
    candidates: I,
    current: &CellLayout,
    direction: MoveDirection,
    epsilon: f64,
) -> Option<usize>
where
    I: IntoIterator<Item = &'a CellLayout>,
{
    candidates.into_iter().position(|candidate| {
        !candidate.approx_eq(current, epsilon) && is_adjacent(current, candidate, direction, epsilon)
    })
}

/// Slice flavour of [`find_adjacent`] returning the target layout itself.
pub fn move_from<'a>(
    cells: &'a [CellLayout],
    current: &CellLayout,
    direction: MoveDirection,
    epsilon: f64,
) -> Option<&'a CellLayout> {
    find_adjacent(cells.iter(), current, direction, epsilon).map(|idx| &cells[idx])
}
