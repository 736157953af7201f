//! Terminal-condition detection.

use super::super::{Board, Position};
use tracing::instrument;

/// Returns true once the poisoned cell is gone.
///
/// The bite that takes the poison clears the whole bar, so this is also
/// the point where no legal bite remains.
#[instrument(skip(board))]
pub fn is_poison_eaten(board: &Board) -> bool {
    !board.is_present(Position::POISON)
}
