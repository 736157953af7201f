//! Staircase invariant: the remaining bar is anchored at the poison.

use super::super::{Board, Position};
use super::Invariant;

/// Invariant: if a cell is present, every cell above and to its left is too.
///
/// Every bite removes a down-right rectangle, so starting from a full bar the
/// remaining cells always form a staircase hanging off `(0, 0)`.
pub struct StaircaseInvariant;

impl Invariant<Board> for StaircaseInvariant {
    fn holds(board: &Board) -> bool {
        Position::all()
            .filter(|p| board.is_present(*p))
            .all(|p| Position::all().filter(|q| q.covers(p)).all(|q| board.is_present(q)))
    }

    fn description() -> &'static str {
        "Remaining cells form a staircase anchored at the poison"
    }
}
