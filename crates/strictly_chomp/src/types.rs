//! Core domain types for Chomp.

use super::action::MoveError;
use super::contracts::{ChompContract, Contract};
use super::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of rows on the board.
pub const ROWS: usize = 4;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// 4×7 chocolate bar. `true` means the cell has not been eaten.
///
/// Cells only ever go from present to eaten, never back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[bool; COLS]; ROWS],
}

impl Board {
    /// Creates a full bar.
    pub fn new() -> Self {
        Self {
            cells: [[true; COLS]; ROWS],
        }
    }

    /// Creates a board from explicit cell state.
    ///
    /// No shape is enforced; use [`crate::ChompInvariants`] to check
    /// whether the result is reachable by play.
    pub fn from_cells(cells: [[bool; COLS]; ROWS]) -> Self {
        Self { cells }
    }

    /// Returns true if the cell has not been eaten.
    pub fn is_present(&self, pos: Position) -> bool {
        self.cells[pos.row()][pos.col()]
    }

    /// Number of cells not yet eaten.
    pub fn remaining(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c).count()
    }

    /// Returns the raw cell grid.
    pub fn cells(&self) -> &[[bool; COLS]; ROWS] {
        &self.cells
    }

    /// Marks a single cell eaten.
    pub(crate) fn clear(&mut self, pos: Position) {
        self.cells[pos.row()][pos.col()] = false;
    }

    /// Legal bites in row-major order.
    pub fn legal_moves(&self) -> Vec<Position> {
        super::rules::legal_moves(self)
    }

    /// Takes a checked bite at `at`, returning the number of cells eaten.
    ///
    /// Contract enforcement:
    /// - Preconditions checked always (the anchor cell is present)
    /// - Postconditions checked in debug builds only
    #[instrument(skip(self), fields(remaining = self.remaining()))]
    pub fn chomp(&mut self, at: Position) -> Result<usize, MoveError> {
        ChompContract::pre(self, &at)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let eaten = super::rules::apply_chomp(self, at);
        debug!(eaten, "Bite applied");

        #[cfg(debug_assertions)]
        ChompContract::post(&before, self)?;

        Ok(eaten)
    }

    /// Formats the board as one line per row, `X` present and `.` eaten.
    pub fn render(&self) -> String {
        let mut result = String::with_capacity(ROWS * (COLS + 1));
        for row in &self.cells {
            for &present in row {
                result.push(if present { 'X' } else { '.' });
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
