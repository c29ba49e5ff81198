//! Error types for the sweepbot crate.

use thiserror::Error;

use crate::types::Position;

/// Construction and configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// Grid with zero rows or zero columns.
    #[error("empty grid: {rows}x{cols}")]
    EmptyGrid {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Row whose length differs from the first row.
    #[error("ragged grid: row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The sweep task panicked and took the controller with it.
    #[error("sweep controller lost after a failed run")]
    ControllerLost,
}

impl SimError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Recoverable rejection of a robot action. State is left untouched and the
/// message is shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Diagonal, oversized or null step.
    #[error("Déplacement non autorisé.")]
    NotAllowed {
        /// Requested row delta.
        d_row: i32,
        /// Requested column delta.
        d_col: i32,
    },

    /// Target outside the grid.
    #[error("Déplacement impossible, limite atteinte.")]
    BoundaryReached {
        /// Position of the robot when the move was requested.
        from: Position,
    },

    /// Not enough charge to enter the target tile.
    #[error("Batterie insuffisante pour ce déplacement.")]
    InsufficientBattery {
        /// Cost of the move.
        needed: u32,
        /// Charge left.
        available: u32,
    },
}

/// Result type for sweepbot construction operations.
pub type Result<T> = std::result::Result<T, SimError>;
