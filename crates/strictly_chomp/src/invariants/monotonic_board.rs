//! Monotonic board invariant: eaten cells stay eaten.

use super::super::{Board, Position};
use super::Invariant;

/// Invariant over a `(before, after)` pair: no cell goes from eaten back to
/// present.
pub struct MonotonicBoardInvariant;

impl Invariant<(Board, Board)> for MonotonicBoardInvariant {
    fn holds((before, after): &(Board, Board)) -> bool {
        Position::all().all(|p| before.is_present(p) || !after.is_present(p))
    }

    fn description() -> &'static str {
        "Board cells are monotonic (eaten cells never return)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_board_holds() {
        let board = Board::new();
        assert!(MonotonicBoardInvariant::holds(&(board.clone(), board)));
    }

    #[test]
    fn test_bite_holds() {
        let before = Board::new();
        let mut after = before.clone();
        after.chomp(Position::new(2, 0).unwrap()).unwrap();
        assert!(MonotonicBoardInvariant::holds(&(before, after)));
    }

    #[test]
    fn test_restored_cell_violates() {
        let mut before = Board::new();
        before.chomp(Position::new(1, 1).unwrap()).unwrap();
        let after = Board::new();
        assert!(!MonotonicBoardInvariant::holds(&(before, after)));
    }
}
