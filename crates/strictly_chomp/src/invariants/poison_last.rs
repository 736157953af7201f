//! Poison-last invariant.

use super::super::Board;
use super::super::rules::is_poison_eaten;
use super::Invariant;

/// Invariant: once the poison is eaten, nothing else remains.
pub struct PoisonLastInvariant;

impl Invariant<Board> for PoisonLastInvariant {
    fn holds(board: &Board) -> bool {
        !is_poison_eaten(board) || board.remaining() == 0
    }

    fn description() -> &'static str {
        "Poison is the last cell eaten"
    }
}
