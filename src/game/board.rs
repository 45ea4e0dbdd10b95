use std::fmt;

use crate::error::{BoardError, MoveError};

use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Wire value of the cell: 0 empty, +1 Red, -1 Yellow.
    pub fn value(self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Yellow => -1,
        }
    }

    pub fn from_value(value: i32) -> Option<Cell> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Red),
            -1 => Some(Cell::Yellow),
            _ => None,
        }
    }

    /// The player owning this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Player::Red),
            Cell::Yellow => Some(Player::Yellow),
        }
    }
}

/// A `rows x cols` grid. Row 0 is the bottom row; discs stack upward from it.
///
/// Cloning yields an independent grid, which is what the search relies on to
/// keep sibling branches isolated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board of the given shape.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::ZeroDimension { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// The standard 6x7 board.
    pub fn standard() -> Self {
        Board {
            rows: ROWS,
            cols: COLS,
            cells: vec![Cell::Empty; ROWS * COLS],
        }
    }

    /// Decode a grid of `{-1, 0, 1}` values, `rows[0]` being the bottom row.
    ///
    /// Rejects empty grids, ragged rows and out-of-range values. Gravity is not
    /// checked; floating discs are the caller's business.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, BoardError> {
        let first = rows.first().ok_or(BoardError::Empty)?;
        let cols = first.as_ref().len();
        let mut board = Board::new(rows.len(), cols)?;

        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(BoardError::RaggedRow {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                let cell = Cell::from_value(value).ok_or(BoardError::InvalidCell {
                    row: r,
                    col: c,
                    value,
                })?;
                board.set(r, c, cell);
            }
        }

        Ok(board)
    }

    /// Encode back into wire values, bottom row first.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.value()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.get(self.rows - 1, col) != Cell::Empty
    }

    /// Every column whose top cell is empty, ascending.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    /// Drop a piece in a column, returns the row where it landed.
    ///
    /// A full or out-of-range column is an error and leaves the board untouched.
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= self.cols {
            return Err(MoveError::InvalidColumn {
                column: col,
                cols: self.cols,
            });
        }

        let row = (0..self.rows)
            .find(|&row| self.get(row, col) == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))?;
        self.set(row, col, player.to_cell());
        Ok(row)
    }

    /// Copy the board and drop `player`'s disc into `col` on the copy.
    pub fn with_move(&self, col: usize, player: Player) -> Result<Board, MoveError> {
        let mut next = self.clone();
        next.drop_piece(col, player)?;
        Ok(next)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Check if the disc at (row, col) is part of a line of four.
    ///
    /// Only lines through that cell are examined, so this is the cheap check
    /// after a single drop; [`winner`](super::lines::winner) scans the whole grid.
    pub fn check_win_at(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        [(0, 1), (1, 0), (1, 1), (1, -1)].iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, cell) + self.run_length(row, col, -dr, -dc, cell)
                >= 4
        })
    }

    /// Count consecutive `cell`s from (row, col) exclusive, stepping by (dr, dc).
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && c >= 0
            && (r as usize) < self.rows
            && (c as usize) < self.cols
            && self.get(r as usize, c as usize) == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Top row first; `.` empty, `X` Red, `O` Yellow.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                let ch = match self.get(row, col) {
                    Cell::Empty => '.',
                    Cell::Red => 'X',
                    Cell::Yellow => 'O',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
