//! Contract-based validation for Chomp.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::MoveError;
use super::invariants::{ChompInvariants, Invariant, InvariantSet, MonotonicBoardInvariant};
use super::{Board, Position};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Bite Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the anchor cell must still be present.
pub struct CellIsPresent;

impl CellIsPresent {
    /// Checks that `at` has not been eaten.
    #[instrument(skip(board))]
    pub fn check(board: &Board, at: Position) -> Result<(), MoveError> {
        if board.is_present(at) {
            Ok(())
        } else {
            Err(MoveError::AlreadyEaten(at))
        }
    }
}

/// Composite precondition for a legal bite.
///
/// Bounds are guaranteed by [`Position`] construction, so presence is the
/// only runtime check.
pub struct LegalChomp;

impl LegalChomp {
    /// Validates all preconditions for a bite.
    #[instrument(skip(board))]
    pub fn check(board: &Board, at: Position) -> Result<(), MoveError> {
        CellIsPresent::check(board, at)
    }
}

// ─────────────────────────────────────────────────────────────
//  Bite Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for bites.
///
/// Preconditions:
/// - Anchor cell is present
///
/// Postconditions:
/// - No cell came back
/// - Board keeps its staircase shape
/// - Poison is only gone when everything is gone
pub struct ChompContract;

impl Contract<Board, Position> for ChompContract {
    fn pre(board: &Board, at: &Position) -> Result<(), MoveError> {
        LegalChomp::check(board, *at)
    }

    fn post(before: &Board, after: &Board) -> Result<(), MoveError> {
        let mut descriptions = Vec::new();

        if !MonotonicBoardInvariant::holds(&(before.clone(), after.clone())) {
            descriptions.push(MonotonicBoardInvariant::description().to_string());
        }

        if let Err(violations) = ChompInvariants::check_all(after) {
            descriptions.extend(violations.into_iter().map(|v| v.description));
        }

        if descriptions.is_empty() {
            Ok(())
        } else {
            warn!(?descriptions, "Postcondition failed");
            Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                descriptions.join("; ")
            )))
        }
    }
}
