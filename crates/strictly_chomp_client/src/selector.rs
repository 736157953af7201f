//! Local move selection.
//!
//! Turns a line the player typed into a bite, checked against the legal
//! cells for this turn. The driver keeps asking until one is accepted.

use strictly_chomp::{MoveError, Position};
use tracing::{debug, instrument};

/// Prompt shown when it is our turn.
pub const MOVE_PROMPT: &str = "Enter row col: ";

/// Words that leave the game instead of biting.
const LEAVE_WORDS: [&str; 2] = ["quit", "q"];

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Bite here.
    Play(Position),
    /// Leave the game.
    Leave,
}

/// Validates player input against the legal cells.
pub struct MoveSelector;

impl MoveSelector {
    /// Interprets one line of input.
    ///
    /// Accepts two integers naming a cell in `legal`, or a leave word.
    #[instrument(skip(legal), fields(choices = legal.len()))]
    pub fn select(legal: &[Position], input: &str) -> Result<Choice, MoveError> {
        let trimmed = input.trim();
        if LEAVE_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
            return Ok(Choice::Leave);
        }

        let position: Position = trimmed.parse()?;
        if !legal.contains(&position) {
            debug!(%position, "Cell not among legal moves");
            return Err(MoveError::AlreadyEaten(position));
        }
        Ok(Choice::Play(position))
    }

    /// Line shown to the player when input is rejected.
    pub fn rejection(err: &MoveError) -> &'static str {
        match err {
            MoveError::Unparseable(_) => "Invalid input, use: row col",
            _ => "Invalid move, try again.",
        }
    }
}
