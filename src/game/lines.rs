//! Enumeration of every 4-cell window on a board and whole-board win detection.
//!
//! The same enumeration drives both the terminal check ([`winner`]) and the
//! windowed heuristic in [`crate::ai::heuristic`].

use std::ops::Range;

use super::board::{Board, Cell};
use super::player::Player;

/// Number of aligned discs needed to win.
pub const LINE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Up and to the right: (row + 1, col + 1).
    AscendingDiagonal,
    /// Down and to the right: (row - 1, col + 1).
    DescendingDiagonal,
}

impl Orientation {
    /// Scan order used by [`windows`].
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::AscendingDiagonal,
        Orientation::DescendingDiagonal,
    ];

    /// (row, col) step between consecutive cells of a window.
    pub fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::AscendingDiagonal => (1, 1),
            Orientation::DescendingDiagonal => (-1, 1),
        }
    }

    /// Rows where a window of this orientation can start.
    fn start_rows(self, rows: usize) -> Range<usize> {
        let span = LINE_LEN - 1;
        match self {
            Orientation::Horizontal => 0..rows,
            Orientation::Vertical | Orientation::AscendingDiagonal => 0..rows.saturating_sub(span),
            // the window looks back three rows
            Orientation::DescendingDiagonal => span..rows,
        }
    }

    /// Columns where a window of this orientation can start.
    fn start_cols(self, cols: usize) -> Range<usize> {
        match self {
            Orientation::Vertical => 0..cols,
            _ => 0..cols.saturating_sub(LINE_LEN - 1),
        }
    }
}

/// Four consecutive cells along one orientation, starting at (`row`, `col`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
    pub cells: [Cell; LINE_LEN],
}

impl Window {
    fn read(board: &Board, row: usize, col: usize, orientation: Orientation) -> Self {
        let (dr, dc) = orientation.step();
        let mut cells = [Cell::Empty; LINE_LEN];
        for (i, cell) in cells.iter_mut().enumerate() {
            let r = (row as isize + dr * i as isize) as usize;
            let c = (col as isize + dc * i as isize) as usize;
            *cell = board.get(r, c);
        }
        Window {
            row,
            col,
            orientation,
            cells,
        }
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// The player holding all four cells, if any.
    pub fn owner(&self) -> Option<Player> {
        let first = self.cells[0].player()?;
        self.cells
            .iter()
            .all(|&c| c == self.cells[0])
            .then_some(first)
    }

    /// Board coordinates of the four cells.
    pub fn positions(&self) -> [(usize, usize); LINE_LEN] {
        let (dr, dc) = self.orientation.step();
        std::array::from_fn(|i| {
            (
                (self.row as isize + dr * i as isize) as usize,
                (self.col as isize + dc * i as isize) as usize,
            )
        })
    }
}

/// Every window on the board: orientations in [`Orientation::ALL`] order,
/// then rows, then columns.
pub fn windows(board: &Board) -> impl Iterator<Item = Window> + '_ {
    Orientation::ALL
        .into_iter()
        .flat_map(move |orientation| windows_along(board, orientation))
}

/// Every window of one orientation, rows then columns.
pub fn windows_along(board: &Board, orientation: Orientation) -> impl Iterator<Item = Window> + '_ {
    let cols = orientation.start_cols(board.cols());
    orientation.start_rows(board.rows()).flat_map(move |row| {
        cols.clone()
            .map(move |col| Window::read(board, row, col, orientation))
    })
}

/// First line of four found in scan order.
pub fn winning_line(board: &Board) -> Option<Window> {
    windows(board).find(|w| w.owner().is_some())
}

/// The player owning the first line of four found, or `None`.
///
/// Does not look for a second, opposing line; see [`both_sides_won`].
pub fn winner(board: &Board) -> Option<Player> {
    windows(board).find_map(|w| w.owner())
}

/// True when both players own a line of four, which alternating play from an
/// empty board cannot produce.
pub fn both_sides_won(board: &Board) -> bool {
    let mut red = false;
    let mut yellow = false;
    for owner in windows(board).filter_map(|w| w.owner()) {
        match owner {
            Player::Red => red = true,
            Player::Yellow => yellow = true,
        }
        if red && yellow {
            return true;
        }
    }
    false
}
