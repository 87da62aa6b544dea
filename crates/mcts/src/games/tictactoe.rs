//! Tic-tac-toe on a 3×3 board.
//!
//! Cells are indexed 0-8 in row-major order:
//! ```text
//! 0 | 1 | 2
//! ---------
//! 3 | 4 | 5
//! ---------
//! 6 | 7 | 8
//! ```

use std::fmt;
use std::str::FromStr;
use tictac_core::{Game, GameError, Mark, Result};

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// The eight winning lines.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe board.
///
/// A plain value: moves produce a new board and never touch the old one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Board {
    cells: [Option<Mark>; CELLS],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }

    /// Build a board from raw cells.
    pub fn from_cells(cells: [Option<Mark>; CELLS]) -> Self {
        Self { cells }
    }

    /// Get the mark at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Option<Mark>; CELLS] {
        &self.cells
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// Check whether `mark` holds any complete line.
    pub fn is_win(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(mark)))
    }

    /// Indices of empty cells, ascending.
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Check if the board is full.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Return a copy of the board with `mark` placed on `index`.
    ///
    /// # Errors
    /// `OutOfRange` for an index past the last cell, `Occupied` if the
    /// cell already holds a mark.
    pub fn with_move(&self, index: usize, mark: Mark) -> Result<Self> {
        match self.cells.get(index) {
            None => Err(GameError::OutOfRange { index }),
            Some(Some(_)) => Err(GameError::Occupied { index }),
            Some(None) => {
                let mut next = *self;
                next.cells[index] = Some(mark);
                Ok(next)
            }
        }
    }

    /// Multi-line grid rendering for terminals and logs.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            if row > 0 {
                out.push_str("---+---+---\n");
            }
            for col in 0..3 {
                if col > 0 {
                    out.push('|');
                }
                let symbol = self.cells[row * 3 + col].map_or(' ', Mark::symbol);
                out.push(' ');
                out.push(symbol);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

/// Compact form: nine characters over `-`, `O`, `X`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            let c = cell.map_or('-', Mark::symbol);
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = GameError;

    /// Parse the compact form. `.` and `_` also count as empty, marks are
    /// case-insensitive, and whitespace, `|` and `/` are ignored so that
    /// `"OO-/---/---"` and multi-line input both work.
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = [None; CELLS];
        let mut filled = 0;

        for c in s.chars() {
            if c.is_whitespace() || c == '|' || c == '/' {
                continue;
            }
            let cell = match c {
                '-' | '.' | '_' => None,
                other => Some(Mark::from_symbol(other).ok_or_else(|| {
                    GameError::InvalidBoard(format!("unexpected character '{}'", other))
                })?),
            };
            if filled == CELLS {
                return Err(GameError::InvalidBoard(format!(
                    "expected {} cells, got more",
                    CELLS
                )));
            }
            cells[filled] = cell;
            filled += 1;
        }

        if filled != CELLS {
            return Err(GameError::InvalidBoard(format!(
                "expected {} cells, got {}",
                CELLS, filled
            )));
        }
        Ok(Self { cells })
    }
}

/// Tic-tac-toe rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type State = Board;

    fn initial_state(&self) -> Self::State {
        Board::new()
    }

    fn empty_positions(&self, state: &Self::State) -> Vec<usize> {
        state.empty_positions()
    }

    fn apply(&self, state: &Self::State, index: usize, mark: Mark) -> Result<Self::State> {
        state.with_move(index, mark)
    }

    fn is_win(&self, mark: Mark, state: &Self::State) -> bool {
        state.is_win(mark)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_win(Mark::O) || state.is_win(Mark::X) || state.is_full()
    }
}
