//! Errors raised when validating a bite.

use super::Position;

/// Error that can occur when parsing, validating, or applying a bite.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The input was not two whitespace-separated integers.
    #[display("Cannot parse {:?} as a move, expected \"row col\"", _0)]
    Unparseable(String),

    /// The coordinates fall outside the board.
    #[display("Cell ({}, {}) is outside the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The cell has already been eaten.
    #[display("Cell {} has already been eaten", _0)]
    AlreadyEaten(Position),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
