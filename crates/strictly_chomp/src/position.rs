//! Bounds-checked board coordinates.
//!
//! A [`Position`] names both a cell and the bite anchored at that cell.
//! It serializes as a two-element `[row, col]` array, which is also the
//! shape of a move on the wire.

use super::action::MoveError;
use super::types::{COLS, ROWS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A cell on the 4×7 board, always in range.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "(i64, i64)", into = "(usize, usize)")]
#[display("({},{})", row, col)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// The poisoned cell in the top-left corner.
    pub const POISON: Position = Position { row: 0, col: 0 };

    /// Creates a position, rejecting coordinates outside the board.
    #[instrument]
    pub fn new(row: usize, col: usize) -> Result<Self, MoveError> {
        if row >= ROWS || col >= COLS {
            return Err(MoveError::OutOfBounds {
                row: i64::try_from(row).unwrap_or(i64::MAX),
                col: i64::try_from(col).unwrap_or(i64::MAX),
            });
        }
        Ok(Self { row, col })
    }

    /// Creates a position from signed coordinates (user input, wire values).
    #[instrument]
    pub fn from_signed(row: i64, col: i64) -> Result<Self, MoveError> {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) if r < ROWS && c < COLS => Ok(Self { row: r, col: c }),
            _ => Err(MoveError::OutOfBounds { row, col }),
        }
    }

    /// Row index, 0 at the top.
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index, 0 at the left.
    pub fn col(self) -> usize {
        self.col
    }

    /// Returns true for the poisoned cell.
    pub fn is_poison(self) -> bool {
        self == Self::POISON
    }

    /// Returns true if a bite anchored here removes `other`.
    pub fn covers(self, other: Position) -> bool {
        other.row >= self.row && other.col >= self.col
    }

    /// All 28 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| Position { row, col }))
    }
}

impl FromStr for Position {
    type Err = MoveError;

    /// Parses `"row col"`: exactly two whitespace-separated integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let parsed = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(r), Some(c), None) => r.parse::<i64>().ok().zip(c.parse::<i64>().ok()),
            _ => None,
        };
        let (row, col) = parsed.ok_or_else(|| MoveError::Unparseable(s.trim().to_string()))?;
        Self::from_signed(row, col)
    }
}

impl TryFrom<(i64, i64)> for Position {
    type Error = MoveError;

    fn try_from((row, col): (i64, i64)) -> Result<Self, Self::Error> {
        Self::from_signed(row, col)
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Position::new(3, 6).is_ok());
        assert_eq!(
            Position::new(4, 0),
            Err(MoveError::OutOfBounds { row: 4, col: 0 })
        );
        assert!(Position::new(0, 7).is_err());
    }

    #[test]
    fn test_from_signed_rejects_negative() {
        assert_eq!(
            Position::from_signed(-1, 2),
            Err(MoveError::OutOfBounds { row: -1, col: 2 })
        );
    }

    #[test]
    fn test_parse_two_integers() {
        let pos: Position = "  1 2 ".parse().unwrap();
        assert_eq!((pos.row(), pos.col()), (1, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("a b".parse::<Position>(), Err(MoveError::Unparseable(_))));
        assert!(matches!("1".parse::<Position>(), Err(MoveError::Unparseable(_))));
        assert!(matches!("1 2 3".parse::<Position>(), Err(MoveError::Unparseable(_))));
        assert!(matches!("".parse::<Position>(), Err(MoveError::Unparseable(_))));
    }

    #[test]
    fn test_parse_out_of_bounds() {
        assert_eq!(
            "9 9".parse::<Position>(),
            Err(MoveError::OutOfBounds { row: 9, col: 9 })
        );
    }

    #[test]
    fn test_all_is_row_major() {
        let all: Vec<_> = Position::all().collect();
        assert_eq!(all.len(), ROWS * COLS);
        assert_eq!(all[0], Position::POISON);
        assert_eq!(all[1], Position::new(0, 1).unwrap());
        assert_eq!(all[COLS], Position::new(1, 0).unwrap());
    }

    #[test]
    fn test_covers() {
        let anchor = Position::new(1, 2).unwrap();
        assert!(anchor.covers(Position::new(3, 6).unwrap()));
        assert!(anchor.covers(anchor));
        assert!(!anchor.covers(Position::new(0, 6).unwrap()));
        assert!(!anchor.covers(Position::new(3, 1).unwrap()));
    }

    #[test]
    fn test_serializes_as_array() {
        let pos = Position::new(2, 5).unwrap();
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[2,5]");
        let back: Position = serde_json::from_str("[2,5]").unwrap();
        assert_eq!(back, pos);
        assert!(serde_json::from_str::<Position>("[4,0]").is_err());
    }
}
