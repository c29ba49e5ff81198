use crate::types::TileState;

/// One unit cell of the house.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub state: TileState,
}

impl Tile {
    pub fn new(state: TileState) -> Self {
        Self { state }
    }

    /// Dirty becomes CleanedByRobot; any other state is left alone.
    pub fn clean(&mut self) {
        if self.state == TileState::Dirty {
            self.state = TileState::CleanedByRobot;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state == TileState::Dirty
    }

    pub fn is_clean(&self) -> bool {
        matches!(self.state, TileState::Clean | TileState::CleanedByRobot)
    }

    pub fn symbol(&self) -> &'static str {
        match self.state {
            TileState::Clean => "🧼",
            TileState::CleanedByRobot => "🧽",
            TileState::Dirty => "💩",
        }
    }
}
