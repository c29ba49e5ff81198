//! # Sweepbot Types Module
//!
//! Core data types and constants shared by the whole simulation: tile
//! cleanliness states, grid positions, movement directions and the
//! battery cost model.
//!
//! All state types are serializable so snapshots can be emitted by the
//! headless renderer.

use serde::{Deserialize, Serialize};

/// NOTE - Grid coordinate as `(row, col)`
pub type Position = (usize, usize);

/// NOTE - Cleanliness state of a single tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Clean,          // NOTE - Clean from the start
    CleanedByRobot, // NOTE - Was dirty, cleaned by the robot (terminal)
    Dirty,          // NOTE - Needs cleaning
}

/// NOTE - Axis-aligned single step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row/column delta of this step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Position one step away, `None` when it would underflow.
    pub fn apply(self, (row, col): Position) -> Option<Position> {
        let (d_row, d_col) = self.delta();
        Some((
            row.checked_add_signed(d_row as isize)?,
            col.checked_add_signed(d_col as isize)?,
        ))
    }

    /// Next step from `from` toward `to`: the row axis is closed first, then
    /// the column axis. `None` once `from == to`.
    pub fn toward(from: Position, to: Position) -> Option<Self> {
        if to.0 > from.0 {
            Some(Direction::Down)
        } else if to.0 < from.0 {
            Some(Direction::Up)
        } else if to.1 > from.1 {
            Some(Direction::Right)
        } else if to.1 < from.1 {
            Some(Direction::Left)
        } else {
            None
        }
    }
}

/// |Δrow| + |Δcol|
pub fn manhattan(a: Position, b: Position) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// NOTE - Full battery level, also the exact level after a recharge
pub const BATTERY_MAX: u32 = 100;

/// NOTE - Cost of entering a clean tile
pub const MOVE_COST_CLEAN: u32 = 5;

/// NOTE - Cost of entering a dirty tile (harder ground)
pub const MOVE_COST_DIRTY: u32 = 10;

/// NOTE - Cost of cleaning the current tile, also the minimum charge required
pub const CLEAN_COST: u32 = 10;

/// NOTE - Default grid dimensions (square house)
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toward_closes_rows_before_columns() {
        assert_eq!(Direction::toward((0, 0), (2, 3)), Some(Direction::Down));
        assert_eq!(Direction::toward((2, 0), (2, 3)), Some(Direction::Right));
        assert_eq!(Direction::toward((4, 4), (1, 1)), Some(Direction::Up));
        assert_eq!(Direction::toward((1, 4), (1, 1)), Some(Direction::Left));
        assert_eq!(Direction::toward((3, 3), (3, 3)), None);
    }

    #[test]
    fn apply_stops_at_zero() {
        assert_eq!(Direction::Up.apply((0, 4)), None);
        assert_eq!(Direction::Left.apply((2, 0)), None);
        assert_eq!(Direction::Down.apply((2, 0)), Some((3, 0)));
        assert_eq!(Direction::Right.apply((2, 0)), Some((2, 1)));
    }

    #[test]
    fn manhattan_is_symmetric() {
        assert_eq!(manhattan((5, 5), (0, 0)), 10);
        assert_eq!(manhattan((0, 9), (5, 5)), 9);
        assert_eq!(manhattan((9, 9), (5, 5)), 8);
    }
}
