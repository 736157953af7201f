//! Bite application and legal-move enumeration.

use super::super::{Board, Position};
use tracing::{instrument, trace};

/// Cells removed by a bite anchored at `at`, in row-major order.
pub fn bite_region(at: Position) -> impl Iterator<Item = Position> {
    Position::all().filter(move |p| at.covers(*p))
}

/// Clears every cell at or below and to the right of `at`.
///
/// Unchecked: the anchor may already be eaten, in which case the call only
/// clears whatever is still present in the region. Returns the number of
/// cells that went from present to eaten.
#[instrument(skip(board))]
pub fn apply_chomp(board: &mut Board, at: Position) -> usize {
    let mut eaten = 0;
    for pos in bite_region(at) {
        if board.is_present(pos) {
            board.clear(pos);
            eaten += 1;
        }
    }
    trace!(eaten, "Region cleared");
    eaten
}

/// Every present cell, in row-major order.
///
/// Recomputed on each call; the board mutates between turns.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board) -> Vec<Position> {
    Position::all().filter(|p| board.is_present(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COLS, ROWS};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_apply_clears_exactly_the_region() {
        for anchor in Position::all() {
            let mut board = Board::new();
            apply_chomp(&mut board, anchor);
            for cell in Position::all() {
                assert_eq!(
                    board.is_present(cell),
                    !anchor.covers(cell),
                    "anchor {anchor}, cell {cell}"
                );
            }
        }
    }

    #[test]
    fn test_apply_leaves_others_unchanged() {
        let mut board = Board::new();
        apply_chomp(&mut board, pos(2, 2));
        let before = board.clone();
        apply_chomp(&mut board, pos(0, 5));
        for cell in Position::all() {
            if !pos(0, 5).covers(cell) {
                assert_eq!(board.is_present(cell), before.is_present(cell));
            }
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut board = Board::new();
        assert_eq!(apply_chomp(&mut board, pos(1, 3)), 12);
        let once = board.clone();
        assert_eq!(apply_chomp(&mut board, pos(1, 3)), 0);
        assert_eq!(board, once);
        assert_eq!(apply_chomp(&mut board, pos(2, 4)), 0);
        assert_eq!(board, once);
    }

    #[test]
    fn test_apply_is_monotonic() {
        let mut board = Board::new();
        let mut eaten: Vec<Position> = Vec::new();
        for anchor in [pos(3, 0), pos(1, 5), pos(0, 6), pos(2, 2), pos(1, 1)] {
            apply_chomp(&mut board, anchor);
            assert!(eaten.iter().all(|p| !board.is_present(*p)));
            eaten.extend(Position::all().filter(|p| !board.is_present(*p)));
        }
    }

    #[test]
    fn test_legal_moves_full_board() {
        let moves = legal_moves(&Board::new());
        assert_eq!(moves.len(), ROWS * COLS);
        assert_eq!(moves, Position::all().collect::<Vec<_>>());
    }

    #[test]
    fn test_legal_moves_excludes_eaten() {
        let mut board = Board::new();
        apply_chomp(&mut board, pos(1, 2));
        let moves = legal_moves(&board);
        assert_eq!(moves.len(), 13);
        assert!(moves.iter().all(|p| board.is_present(*p)));
        assert!(!moves.contains(&pos(3, 6)));
        assert!(moves.contains(&pos(0, 6)));
        assert!(moves.contains(&pos(3, 1)));
    }

    #[test]
    fn test_bite_region_size() {
        assert_eq!(bite_region(Position::POISON).count(), ROWS * COLS);
        assert_eq!(bite_region(pos(3, 6)).count(), 1);
        assert_eq!(bite_region(pos(1, 2)).count(), 15);
    }
}
