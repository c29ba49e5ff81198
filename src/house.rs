use crate::error::{Result, SimError};
use crate::tile::Tile;
use crate::types::{manhattan, Position, TileState, MOVE_COST_CLEAN, MOVE_COST_DIRTY};
use rand::Rng;
use tracing::warn;

/// Rectangular grid of tiles. `tiles[row][col]`, every row has `cols` tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct House {
    tiles: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
}

impl House {
    /// Random layout: each tile is independently dirty with `dirty_probability`.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        dirty_probability: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::EmptyGrid { rows, cols });
        }
        if !(0.0..=1.0).contains(&dirty_probability) {
            return Err(SimError::invalid_config(format!(
                "dirty probability {dirty_probability} not in [0, 1]"
            )));
        }

        let mut tiles = Vec::with_capacity(rows);
        for _ in 0..rows {
            let mut row = Vec::with_capacity(cols);
            for _ in 0..cols {
                let state = if rng.gen_bool(dirty_probability) {
                    TileState::Dirty
                } else {
                    TileState::Clean
                };
                row.push(Tile::new(state));
            }
            tiles.push(row);
        }

        Ok(Self { tiles, rows, cols })
    }

    /// Fixed layout, used for scripted scenarios.
    pub fn from_states(states: Vec<Vec<TileState>>) -> Result<Self> {
        let rows = states.len();
        let cols = states.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(SimError::EmptyGrid { rows, cols });
        }
        if let Some((row, found)) = states
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(SimError::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }

        let tiles = states
            .into_iter()
            .map(|row| row.into_iter().map(Tile::new).collect())
            .collect();
        Ok(Self { tiles, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, (row, col): Position) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn tile(&self, (row, col): Position) -> Option<&Tile> {
        self.tiles.get(row).and_then(|r| r.get(col))
    }

    pub fn is_dirty(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_dirty)
    }

    /// Battery cost of entering `target`.
    pub fn move_cost(&self, target: Position) -> u32 {
        if self.is_dirty(target) {
            MOVE_COST_DIRTY
        } else {
            MOVE_COST_CLEAN
        }
    }

    /// Cleans the tile at `position`. Callers only pass in-bounds positions;
    /// anything else is logged and ignored.
    pub fn clean_at(&mut self, (row, col): Position) {
        match self.tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(tile) => tile.clean(),
            None => warn!(row, col, "clean_at called out of bounds"),
        }
    }

    pub fn is_fully_clean(&self) -> bool {
        self.tiles.iter().all(|row| row.iter().all(Tile::is_clean))
    }

    /// Dirty tile coordinates in row-major order.
    pub fn dirty_tiles(&self) -> Vec<Position> {
        let mut dirty = Vec::new();
        for (r, row) in self.tiles.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if tile.is_dirty() {
                    dirty.push((r, c));
                }
            }
        }
        dirty
    }

    pub fn dirty_count(&self) -> usize {
        self.count(TileState::Dirty)
    }

    pub fn cleaned_by_robot_count(&self) -> usize {
        self.count(TileState::CleanedByRobot)
    }

    fn count(&self, state: TileState) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|tile| tile.state == state)
            .count()
    }

    /// Nearest dirty tile by Manhattan distance; the first one in row-major
    /// order wins ties. `None` when the house is clean.
    pub fn nearest_dirty(&self, from: Position) -> Option<Position> {
        nearest(from, self.dirty_tiles())
    }

    /// Charging corners, in tie-break order.
    pub fn corners(&self) -> [Position; 4] {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        [(0, 0), (0, last_col), (last_row, 0), (last_row, last_col)]
    }

    pub fn nearest_corner(&self, from: Position) -> Position {
        nearest(from, self.corners()).unwrap_or((0, 0))
    }

    /// Tile states, row by row.
    pub fn states(&self) -> Vec<Vec<TileState>> {
        self.tiles
            .iter()
            .map(|row| row.iter().map(|tile| tile.state).collect())
            .collect()
    }

    pub fn row_tiles(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }
}

// Strict comparison keeps the first candidate on equal distances.
fn nearest(from: Position, candidates: impl IntoIterator<Item = Position>) -> Option<Position> {
    let mut best: Option<(usize, Position)> = None;
    for candidate in candidates {
        let distance = manhattan(from, candidate);
        if best.is_none_or(|(min, _)| distance < min) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, position)| position)
}
