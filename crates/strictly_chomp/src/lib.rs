//! Strictly Chomp - pure game logic for Chomp (the poisoned chocolate bar).
//!
//! Two players alternately bite a rectangular region out of a 4×7 bar.
//! A bite at `(row, col)` removes every cell with a row and column at least
//! that large. Cell `(0, 0)` is poisoned: whoever eats it loses.
//!
//! # Architecture
//!
//! - **Types**: [`Board`] storage and rendering
//! - **Position**: bounds-checked coordinates, parsing from user input
//! - **Rules**: pure functions over the board (apply a bite, list legal bites)
//! - **Contracts**: preconditions and postconditions for checked bites
//! - **Invariants**: first-class properties every reachable board satisfies
//!
//! # Example
//!
//! ```
//! use strictly_chomp::{Board, Position};
//!
//! let mut board = Board::new();
//! board.chomp(Position::new(1, 2)?)?;
//! assert_eq!(board.remaining(), 28 - 15);
//! assert!(board.is_present(Position::POISON));
//! # Ok::<(), strictly_chomp::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod position;
mod rules;
mod types;

pub use action::MoveError;
pub use contracts::{CellIsPresent, ChompContract, Contract, LegalChomp};
pub use invariants::{
    ChompInvariants, Invariant, InvariantSet, InvariantViolation, MonotonicBoardInvariant,
    PoisonLastInvariant, StaircaseInvariant,
};
pub use position::Position;
pub use rules::{apply_chomp, bite_region, is_poison_eaten, legal_moves};
pub use types::{Board, COLS, ROWS};
